mod segment;
mod sim_time;
mod simulator;
