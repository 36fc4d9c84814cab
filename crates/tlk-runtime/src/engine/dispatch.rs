use log::debug;
use tlk_core::phrases::{GUARDS_SUMMONED, JOINED_PARTY, MOUNT_CONJURED, SENT_TO_JAIL};
use tlk_core::{CapabilityError, NpcId, SideEffect, TalkOutput};

use super::lifecycle::TalkEngine;
use crate::capability::TalkCapabilities;

/// What the engine does around a side effect once the capability accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct EffectRule {
    pub(super) announcement: Option<&'static str>,
    pub(super) ends_conversation: bool,
}

pub(super) fn rule_for(effect: SideEffect) -> EffectRule {
    let (announcement, ends_conversation) = match effect {
        SideEffect::JoinParty => (Some(JOINED_PARTY), true),
        SideEffect::SummonGuards => (Some(GUARDS_SUMMONED), true),
        SideEffect::SendToJail => (Some(SENT_TO_JAIL), true),
        SideEffect::ConjureMount => (Some(MOUNT_CONJURED), false),
        SideEffect::IncreaseKarma
        | SideEffect::DecreaseKarma
        | SideEffect::PayExtortion { .. }
        | SideEffect::PayHalfGoldExtortion
        | SideEffect::GrantItem { .. } => (None, false),
    };
    EffectRule {
        announcement,
        ends_conversation,
    }
}

pub(super) fn invoke(
    capabilities: &dyn TalkCapabilities,
    npc: NpcId,
    effect: SideEffect,
) -> Result<(), CapabilityError> {
    match effect {
        SideEffect::JoinParty => capabilities.join_party(npc),
        SideEffect::SummonGuards => capabilities.summon_guards(npc),
        SideEffect::IncreaseKarma => capabilities.increase_karma(),
        SideEffect::DecreaseKarma => capabilities.decrease_karma(),
        SideEffect::SendToJail => capabilities.send_to_jail(),
        SideEffect::ConjureMount => capabilities.conjure_mount(npc),
        SideEffect::PayExtortion { amount } => capabilities.pay_extortion(amount),
        SideEffect::PayHalfGoldExtortion => capabilities.pay_half_gold_extortion(),
        SideEffect::GrantItem { item } => capabilities.grant_item(item),
    }
}

impl TalkEngine {
    pub(super) fn apply_side_effect(&mut self, effect: SideEffect) {
        debug!("{}: {}", self.npc, effect.name());
        if let Err(error) = invoke(self.capabilities.as_ref(), self.npc, effect) {
            self.absorb(error);
            return;
        }

        let rule = rule_for(effect);
        if let Some(announcement) = rule.announcement {
            self.say(announcement);
            self.outbox.push_back(TalkOutput::NewLine);
        }
        if rule.ends_conversation {
            debug!("{}: {} ends the conversation", self.npc, effect.name());
            self.terminate();
        }
    }
}
