//! Fixed phrases the engine speaks on its own behalf.

pub const TOPIC_PROMPT: &str = "Your interest?";
pub const NAME_PROMPT: &str = "What is thy name?";
pub const GOLD_PROMPT: &str = "How much?";

pub const DESCRIPTION_PREFIX: &str = "You see ";
pub const INTRODUCTION_PREFIX: &str = "I am called ";
pub const INTRODUCTION_SUFFIX: &str = ".";

pub const UNRECOGNIZED: &str = "I cannot help thee with that.";
pub const NAME_ACCEPTED: &str = "A pleasure!";
pub const NAME_REJECTED: &str = "If you say so...";
pub const GOLD_ACCEPTED: &str = "I thank thee.";
pub const JOINED_PARTY: &str = "I am honoured to join thee!";
pub const GUARDS_SUMMONED: &str = "Guards! Guards!";
pub const SENT_TO_JAIL: &str = "Thou art under arrest!";
pub const MOUNT_CONJURED: &str = "A horse appears before thee.";

pub const NAME_KEYWORDS: &[&str] = &["name"];
pub const JOB_KEYWORDS: &[&str] = &["job", "work"];
pub const FAREWELL_KEYWORDS: &[&str] = &["bye", "goodbye", "farewell"];
