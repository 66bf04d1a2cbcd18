//! The eight criterion scorers. Each is a pure function of the transcript
//! and its rubric section; none depends on another scorer's output.

pub(crate) mod filler;
pub(crate) mod flow;
pub(crate) mod grammar;
pub(crate) mod keywords;
pub(crate) mod salutation;
pub(crate) mod sentiment;
pub(crate) mod speech_rate;
pub(crate) mod vocabulary;
