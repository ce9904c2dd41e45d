#[cfg(test)]
mod permission_test;
#[cfg(test)]
pub mod phrase;
#[cfg(test)]
pub mod schedule;
