mod processing;
mod requirements;
