//! A complete in-memory host, used by tests and the transcript tool.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tlk_core::{CapabilityError, ItemId, NpcId, SideEffect, TalkError};

use crate::capability::TalkCapabilities;

const MAX_KARMA: u8 = 99;

/// A mutating capability call, in the order the engine made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityCall {
    Effect(SideEffect),
    RecordMet(NpcId),
    OfferGold(u32),
    ReportError(String),
}

impl fmt::Display for CapabilityCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Effect(SideEffect::PayExtortion { amount }) => {
                write!(f, "payExtortion({})", amount)
            }
            Self::Effect(SideEffect::GrantItem { item }) => write!(f, "grantItem({})", item.0),
            Self::Effect(effect) => f.write_str(effect.name()),
            Self::RecordMet(npc) => write!(f, "recordMet({})", npc.0),
            Self::OfferGold(amount) => write!(f, "offerGold({})", amount),
            Self::ReportError(code) => write!(f, "reportError({})", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHostState {
    pub avatar_name: String,
    pub karma: u8,
    pub met: BTreeSet<NpcId>,
    pub party: Vec<NpcId>,
    pub party_capacity: usize,
    pub gold: u32,
    pub inventory: BTreeMap<ItemId, u32>,
    pub jailed: bool,
    pub mounts: u32,
    pub guard_alarms: u32,
    pub calls: Vec<CapabilityCall>,
}

#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<MemoryHostState>,
}

impl MemoryHost {
    pub fn new(avatar_name: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryHostState {
                avatar_name: avatar_name.into(),
                karma: 50,
                met: BTreeSet::new(),
                party: Vec::new(),
                party_capacity: 6,
                gold: 100,
                inventory: BTreeMap::new(),
                jailed: false,
                mounts: 0,
                guard_alarms: 0,
                calls: Vec::new(),
            }),
        }
    }

    pub fn with_met(self, npc: NpcId) -> Self {
        self.lock().met.insert(npc);
        self
    }

    pub fn with_karma(self, karma: u8) -> Self {
        self.lock().karma = karma.min(MAX_KARMA);
        self
    }

    pub fn with_gold(self, gold: u32) -> Self {
        self.lock().gold = gold;
        self
    }

    pub fn with_party_capacity(self, capacity: usize) -> Self {
        self.lock().party_capacity = capacity;
        self
    }

    pub fn snapshot(&self) -> MemoryHostState {
        self.lock().clone()
    }

    pub fn calls(&self) -> Vec<CapabilityCall> {
        self.lock().calls.clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.lock().calls.iter().map(ToString::to_string).collect()
    }

    pub fn count(&self, effect: SideEffect) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| **call == CapabilityCall::Effect(effect))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryHostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn effect(&self, effect: SideEffect) -> MutexGuard<'_, MemoryHostState> {
        let mut state = self.lock();
        state.calls.push(CapabilityCall::Effect(effect));
        state
    }
}

impl TalkCapabilities for MemoryHost {
    fn has_met(&self, npc: NpcId) -> Result<bool, CapabilityError> {
        Ok(self.lock().met.contains(&npc))
    }

    fn record_met(&self, npc: NpcId) -> Result<(), CapabilityError> {
        let mut state = self.lock();
        state.calls.push(CapabilityCall::RecordMet(npc));
        state.met.insert(npc);
        Ok(())
    }

    fn avatar_name(&self) -> Result<String, CapabilityError> {
        Ok(self.lock().avatar_name.clone())
    }

    fn karma(&self) -> Result<u8, CapabilityError> {
        Ok(self.lock().karma)
    }

    fn join_party(&self, npc: NpcId) -> Result<(), CapabilityError> {
        let mut state = self.effect(SideEffect::JoinParty);
        if state.party.len() >= state.party_capacity {
            return Err(CapabilityError::PartyFull);
        }
        state.party.push(npc);
        Ok(())
    }

    fn summon_guards(&self, _npc: NpcId) -> Result<(), CapabilityError> {
        self.effect(SideEffect::SummonGuards).guard_alarms += 1;
        Ok(())
    }

    fn increase_karma(&self) -> Result<(), CapabilityError> {
        let mut state = self.effect(SideEffect::IncreaseKarma);
        state.karma = (state.karma + 1).min(MAX_KARMA);
        Ok(())
    }

    fn decrease_karma(&self) -> Result<(), CapabilityError> {
        let mut state = self.effect(SideEffect::DecreaseKarma);
        state.karma = state.karma.saturating_sub(1);
        Ok(())
    }

    fn send_to_jail(&self) -> Result<(), CapabilityError> {
        self.effect(SideEffect::SendToJail).jailed = true;
        Ok(())
    }

    fn conjure_mount(&self, _npc: NpcId) -> Result<(), CapabilityError> {
        self.effect(SideEffect::ConjureMount).mounts += 1;
        Ok(())
    }

    fn pay_extortion(&self, amount: u16) -> Result<(), CapabilityError> {
        let mut state = self.effect(SideEffect::PayExtortion { amount });
        let amount = u32::from(amount);
        if state.gold < amount {
            return Err(CapabilityError::NotEnoughGold);
        }
        state.gold -= amount;
        Ok(())
    }

    fn pay_half_gold_extortion(&self) -> Result<(), CapabilityError> {
        let mut state = self.effect(SideEffect::PayHalfGoldExtortion);
        let half = state.gold / 2;
        state.gold -= half;
        Ok(())
    }

    fn grant_item(&self, item: ItemId) -> Result<(), CapabilityError> {
        let mut state = self.effect(SideEffect::GrantItem { item });
        *state.inventory.entry(item).or_default() += 1;
        Ok(())
    }

    fn offer_gold(&self, amount: u32) -> Result<(), CapabilityError> {
        let mut state = self.lock();
        state.calls.push(CapabilityCall::OfferGold(amount));
        if state.gold < amount {
            return Err(CapabilityError::NotEnoughGold);
        }
        state.gold -= amount;
        Ok(())
    }

    fn report_error(&self, error: &TalkError) {
        self.lock()
            .calls
            .push(CapabilityCall::ReportError(error.code().to_string()));
    }
}
