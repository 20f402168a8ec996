//! CPI interface to the external swap router.
//!
//! The router is any program exposing an Anchor-style `swap_exact_in`
//! instruction that supports fee-on-transfer inputs. Route accounts are
//! supplied by the caller as remaining accounts and forwarded untouched,
//! except that the pool PDA is marked as signer.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

use crate::constants::SWAP_INSTRUCTION_NAME;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SwapExactInArgs {
    pub amount_in: u64,
    pub minimum_amount_out: u64,
    pub deadline: i64,
    pub path: Vec<Pubkey>,
}

/// Anchor sighash for a global instruction.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

pub fn swap_instruction_data(args: &SwapExactInArgs) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(SWAP_INSTRUCTION_NAME).to_vec();
    args.serialize(&mut data)
        .map_err(|_| error!(anchor_lang::error::ErrorCode::InstructionDidNotSerialize))?;
    Ok(data)
}

/// Build account metas for the router, signing as `authority`.
pub fn route_account_metas(route_accounts: &[AccountInfo], authority: &Pubkey) -> Vec<AccountMeta> {
    route_accounts
        .iter()
        .map(|account| {
            let is_signer = account.key == authority || account.is_signer;
            if account.is_writable {
                AccountMeta::new(*account.key, is_signer)
            } else {
                AccountMeta::new_readonly(*account.key, is_signer)
            }
        })
        .collect()
}

/// Swap `args.amount_in` along `args.path`, signed by the pool PDA.
pub fn swap_exact_in<'info>(
    swap_program: &AccountInfo<'info>,
    authority: &Pubkey,
    route_accounts: &[AccountInfo<'info>],
    args: &SwapExactInArgs,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let instruction = Instruction {
        program_id: *swap_program.key,
        accounts: route_account_metas(route_accounts, authority),
        data: swap_instruction_data(args)?,
    };

    let mut account_infos = route_accounts.to_vec();
    account_infos.push(swap_program.clone());

    invoke_signed(&instruction, &account_infos, signer_seeds)?;
    Ok(())
}
