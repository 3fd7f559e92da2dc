//! Sagas transaccionales contra el backend.
//!
//! Todas empiezan pidiendo un identificador de transacción, lo adjuntan
//! como `lastTransactionId` a cada escritura y registran
//! `rollbackTransaction` como compensación global.
pub mod movement;
pub mod palletization;
pub mod return_reception;
pub mod substitution;
pub mod transaction;

pub use movement::validate_movement;
pub use palletization::validate_palletization;
pub use return_reception::validate_return_reception;
pub use substitution::validate_substitution;
pub use transaction::{GenerateTransactionId, RollbackTransaction, TransactionContext, Transactional};
