use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CourseAdded {
    pub course_id: u64,
    pub min_coins_required: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoinRewarded {
    pub user: Address,
    pub course_id: u64,
    pub new_balance: u64,
}

/// Emitted when a claim mints a fresh certificate.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateMinted {
    pub user: Address,
    pub course_id: u64,
    pub token_id: u64,
}

/// Emitted when a claim hands out a certificate from the course inventory.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateClaimed {
    pub user: Address,
    pub course_id: u64,
    pub token_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateStocked {
    pub course_id: u64,
    pub token_id: u64,
    pub inventory_size: u32,
}

pub fn emit_course_added(env: &Env, course_id: u64, min_coins_required: u64) {
    let topics = (symbol_short!("course"), course_id);
    let data = CourseAdded {
        course_id,
        min_coins_required,
    };
    env.events().publish(topics, data);
}

pub fn emit_coin_rewarded(env: &Env, user: Address, course_id: u64, new_balance: u64) {
    let topics = (symbol_short!("coin"), user.clone(), course_id);
    let data = CoinRewarded {
        user,
        course_id,
        new_balance,
    };
    env.events().publish(topics, data);
}

pub fn emit_certificate_minted(env: &Env, user: Address, course_id: u64, token_id: u64) {
    let topics = (symbol_short!("minted"), course_id);
    let data = CertificateMinted {
        user,
        course_id,
        token_id,
    };
    env.events().publish(topics, data);
}

pub fn emit_certificate_claimed(env: &Env, user: Address, course_id: u64, token_id: u64) {
    let topics = (symbol_short!("claimed"), course_id);
    let data = CertificateClaimed {
        user,
        course_id,
        token_id,
    };
    env.events().publish(topics, data);
}

pub fn emit_certificate_stocked(env: &Env, course_id: u64, token_id: u64, inventory_size: u32) {
    let topics = (symbol_short!("cert_add"), course_id);
    let data = CertificateStocked {
        course_id,
        token_id,
        inventory_size,
    };
    env.events().publish(topics, data);
}
