use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateMinted {
    pub token_id: u64,
    pub to: Address,
    pub uri: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintAuthorityTransferred {
    pub previous: Address,
    pub new: Address,
}

pub fn emit_minted(env: &Env, token_id: u64, to: Address, uri: String) {
    let topics = (symbol_short!("mint"), to.clone());
    let data = CertificateMinted { token_id, to, uri };
    env.events().publish(topics, data);
}

/// Topic: `(transfer, from, to)`, data: `token_id`.
pub fn emit_transfer(env: &Env, from: Address, to: Address, token_id: u64) {
    env.events()
        .publish((symbol_short!("transfer"), from, to), token_id);
}

/// Topic: `(approve, owner, approved)`, data: `token_id`.
pub fn emit_approve(env: &Env, owner: Address, approved: Address, token_id: u64) {
    env.events()
        .publish((symbol_short!("approve"), owner, approved), token_id);
}

/// Topic: `(appr_all, owner, operator)`, data: `approved`.
pub fn emit_approve_for_all(env: &Env, owner: Address, operator: Address, approved: bool) {
    env.events()
        .publish((symbol_short!("appr_all"), owner, operator), approved);
}

pub fn emit_authority_transferred(env: &Env, previous: Address, new: Address) {
    let topics = (symbol_short!("auth_xfer"),);
    let data = MintAuthorityTransferred { previous, new };
    env.events().publish(topics, data);
}
