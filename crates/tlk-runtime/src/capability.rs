use tlk_core::{CapabilityError, ItemId, NpcId, TalkError};

/// Host side of a conversation. The engine only reads or mutates game state
/// through these calls; the host owns the state and whatever locking it
/// needs.
pub trait TalkCapabilities: Send + Sync {
    fn has_met(&self, npc: NpcId) -> Result<bool, CapabilityError>;
    fn record_met(&self, npc: NpcId) -> Result<(), CapabilityError>;
    fn avatar_name(&self) -> Result<String, CapabilityError>;
    fn karma(&self) -> Result<u8, CapabilityError>;

    fn join_party(&self, npc: NpcId) -> Result<(), CapabilityError>;
    fn summon_guards(&self, npc: NpcId) -> Result<(), CapabilityError>;
    fn increase_karma(&self) -> Result<(), CapabilityError>;
    fn decrease_karma(&self) -> Result<(), CapabilityError>;
    fn send_to_jail(&self) -> Result<(), CapabilityError>;
    fn conjure_mount(&self, npc: NpcId) -> Result<(), CapabilityError>;
    fn pay_extortion(&self, amount: u16) -> Result<(), CapabilityError>;
    fn pay_half_gold_extortion(&self) -> Result<(), CapabilityError>;
    fn grant_item(&self, item: ItemId) -> Result<(), CapabilityError>;
    fn offer_gold(&self, amount: u32) -> Result<(), CapabilityError>;

    fn report_error(&self, error: &TalkError);
}
