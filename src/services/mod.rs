pub mod chart_service;
pub mod poll_service;

#[cfg(test)]
pub(crate) mod testing;
