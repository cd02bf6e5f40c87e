pub mod draw;
pub mod registry;
pub mod roster;
pub mod session;

#[cfg(test)]
mod testing;

pub use session::Session;
