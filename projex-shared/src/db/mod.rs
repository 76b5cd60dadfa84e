/// Database layer for ProjeX
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with startup health check
/// - `migrations`: embedded SQL migration runner
///
/// Models live in the `models` module at crate root.
pub mod migrations;
pub mod pool;
