pub mod belt;
pub mod sim;
pub mod topo;
pub mod viz;

#[cfg(test)]
mod test;
