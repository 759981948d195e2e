//! # Donation Transaction Builder
//!
//! Pure construction of the donation transaction. Instructions are always ordered:
//!
//! 1. `set_compute_unit_price` (omitted for [`PriorityTier::Low`])
//! 2. System transfer from payer to recipient
//! 3. SPL Memo (omitted when the memo is empty)
//!
//! Nothing here touches the network; the blockhash is supplied by the caller.

use crate::types::{LatestBlockhash, PriorityTier};
use lib_utils::validation::truncate_chars;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;

/// SPL Memo program.
pub const MEMO_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

/// Maximum memo length, in characters.
pub const MAX_MEMO_CHARS: usize = 50;

/// Everything needed to build a donation, minus the blockhash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRequest {
    pub payer: Pubkey,
    pub recipient: Pubkey,
    pub lamports: u64,
    pub tier: PriorityTier,
    pub memo: String,
}

/// An unsigned donation with its blockhash validity window.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    instructions: Vec<Instruction>,
    payer: Pubkey,
    blockhash: LatestBlockhash,
}

impl TransactionDraft {
    pub fn new(request: &DonationRequest, blockhash: LatestBlockhash) -> Self {
        Self {
            instructions: donation_instructions(request),
            payer: request.payer,
            blockhash,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn blockhash(&self) -> &LatestBlockhash {
        &self.blockhash
    }

    /// Compile into a message with the payer as fee payer.
    pub fn message(&self) -> Message {
        Message::new_with_blockhash(&self.instructions, Some(&self.payer), &self.blockhash.blockhash)
    }

    pub fn into_transaction(self) -> Transaction {
        Transaction::new_unsigned(self.message())
    }
}

/// Build the ordered instruction list for a donation.
pub fn donation_instructions(request: &DonationRequest) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(3);

    if let Some(micro_lamports) = request.tier.compute_unit_price() {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_price(micro_lamports));
    }

    instructions.push(system_instruction::transfer(
        &request.payer,
        &request.recipient,
        request.lamports,
    ));

    if let Some(memo) = memo_instruction(&request.memo) {
        instructions.push(memo);
    }

    instructions
}

/// Memo instruction for the first [`MAX_MEMO_CHARS`] characters of `memo`.
///
/// Returns `None` for an empty memo. The memo program takes no accounts.
pub fn memo_instruction(memo: &str) -> Option<Instruction> {
    let memo = truncate_chars(memo, MAX_MEMO_CHARS);
    if memo.is_empty() {
        return None;
    }
    Some(Instruction::new_with_bytes(MEMO_PROGRAM_ID, memo.as_bytes(), vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::compute_budget;
    use solana_sdk::hash::Hash;
    use solana_sdk::system_program;

    fn request(tier: PriorityTier, memo: &str) -> DonationRequest {
        DonationRequest {
            payer: Pubkey::new_unique(),
            recipient: Pubkey::new_unique(),
            lamports: 1_000,
            tier,
            memo: memo.to_string(),
        }
    }

    #[test]
    fn test_full_instruction_order() {
        let ixs = donation_instructions(&request(PriorityTier::High, "thanks!"));
        assert_eq!(ixs.len(), 3);
        assert_eq!(ixs[0].program_id, compute_budget::id());
        assert_eq!(ixs[0], ComputeBudgetInstruction::set_compute_unit_price(10_000_000));
        assert_eq!(ixs[1].program_id, system_program::id());
        assert_eq!(ixs[2].program_id, MEMO_PROGRAM_ID);
        assert_eq!(ixs[2].data, b"thanks!");
        assert!(ixs[2].accounts.is_empty());
    }

    #[test]
    fn test_low_tier_and_empty_memo_only_transfer() {
        let ixs = donation_instructions(&request(PriorityTier::Low, ""));
        assert_eq!(ixs.len(), 1);
        assert_eq!(ixs[0].program_id, system_program::id());
    }

    #[test]
    fn test_memo_truncated_by_characters() {
        let long = "é".repeat(60);
        let ix = memo_instruction(&long).unwrap();
        assert_eq!(String::from_utf8(ix.data).unwrap().chars().count(), MAX_MEMO_CHARS);
    }

    #[test]
    fn test_draft_compiles_with_payer_first() {
        let req = request(PriorityTier::Medium, "gm");
        let blockhash = LatestBlockhash {
            blockhash: Hash::new_unique(),
            last_valid_block_height: 42,
        };
        let draft = TransactionDraft::new(&req, blockhash);
        let message = draft.message();
        assert_eq!(message.account_keys[0], req.payer);
        assert_eq!(message.recent_blockhash, blockhash.blockhash);
        assert_eq!(message.instructions.len(), 3);

        let tx = draft.into_transaction();
        assert_eq!(tx.signatures.len(), 1);
    }
}
