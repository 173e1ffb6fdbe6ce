//! Test doubles and fixtures shared across the workspace.

mod fixtures;
mod memory_store;

pub use fixtures::{
    test_address_key, test_master_key, TEST_ADDRESS_XPRV, TEST_ADDRESS_XPUB, TEST_MASTER_XPRV,
    TEST_MASTER_XPUB, TEST_SEED_HEX,
};
pub use memory_store::MemoryStore;
