//! Lock-bridge contract bindings.
//!
//! The same interface is deployed on both chains: tokens/ETH are locked on
//! the source side and the counterpart bridge releases them on the
//! destination side once the cross-chain message is relayed.

use alloy_sol_types::sol;

sol! {
    /// Lock-bridge contract (L1 and L2 deployments share this surface).
    #[sol(rpc)]
    interface ILockBridge {
        /// Emitted by the L2 bridge when a token withdrawal towards L1 starts
        event WithdrawERC20(
            address indexed l1Token,
            address indexed l2Token,
            address indexed from,
            address to,
            uint256 amount,
            bytes data
        );

        /// Messenger contract this bridge sends and receives messages through
        function messenger() external view returns (address);

        /// Lock `amount` of the bridged token and send it to the other chain.
        ///
        /// `msg.value` must cover the cross-chain execution fee;
        /// `gasLimit` is the execution budget on the destination chain.
        function bridgeToken(uint256 amount, uint256 gasLimit) external payable;

        /// Lock ETH and send it to the other chain.
        ///
        /// `msg.value` = amount to bridge + `gasPrice * gasLimit` fee.
        function bridgeETH(uint256 gasLimit, uint256 gasPrice) external payable;

        /// Update bridge fee parameters (owner only).
        function setFees(
            uint256 fixedFee,
            uint256 percentFeeBps,
            uint256 gasMarkupBps
        ) external;
    }
}
