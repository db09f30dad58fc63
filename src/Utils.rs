//! different utility modules used throughout the project
/// tiny module to save sampled curves into csv or text files
pub mod logger;
/// tiny module to plot functions, their derivatives and surfaces
pub mod plots;
