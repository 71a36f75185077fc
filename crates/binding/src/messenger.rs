//! L1 messenger contract bindings.
//!
//! The messenger is the L1-side entry point for L2→L1 messages. It verifies
//! the Merkle proof against the committed batch root and forwards the encoded
//! call to the target contract (the L1 bridge).

use alloy_sol_types::sol;

sol! {
    /// Proof that an L2→L1 message was included in a committed batch.
    ///
    /// `batch_index` selects the batch whose withdraw root the proof is
    /// verified against; `merkle_proof` is the concatenated sibling nodes.
    #[derive(Debug, PartialEq, Eq)]
    struct L2MessageProof {
        uint256 batchIndex;
        bytes merkleProof;
    }

    /// L1 messenger - relays proven L2→L1 messages to their target.
    #[sol(rpc)]
    interface IL1Messenger {
        /// Emitted when a message is successfully relayed
        event RelayedMessage(bytes32 indexed messageHash);

        /// Emitted when relay execution fails inside the target
        event FailedRelayedMessage(bytes32 indexed messageHash);

        /// Relay an L2→L1 message with its inclusion proof.
        ///
        /// Reverts if the proof does not verify or the message was already
        /// relayed.
        function relayMessageWithProof(
            address _from,
            address _to,
            uint256 _value,
            uint256 _nonce,
            bytes memory _message,
            L2MessageProof memory _proof
        ) external payable;

        /// Sender of the cross-domain message currently being executed
        function xDomainMessageSender() external view returns (address);
    }
}
