mod acknowledgment;
mod change;
mod handoff;
mod report;
