mod cli;
mod pipeline;
