pub mod audit_log;
pub mod tokens;
pub mod whitelist;
