#[allow(non_snake_case)]
pub mod Chemotaxis;
#[allow(non_snake_case)]
pub mod FiniteVolume;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
