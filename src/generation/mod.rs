pub mod powerlaw;
pub mod ring;
