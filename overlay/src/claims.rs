use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use sequoia_shared::{GuildClaim, GuildEntry, GuildKey, Rgba, guild_color};
use tracing::{debug, info, warn};

use crate::gate::InvalidationGate;
use crate::resolve::{ClaimLookup, GuildColorLookup};

/// Persistent territory ownership, written by UI actions and bulk imports
/// and read by the resolver every rebuild.
///
/// Single writes mark the gate dirty unless redraws are suspended; a batch
/// suspends for its duration and marks exactly once at the end, even when
/// it ran inside another suspension.
#[derive(Debug)]
pub struct ClaimStore {
    claims: RwLock<HashMap<String, GuildClaim>>,
    suspend_depth: AtomicUsize,
    gate: Arc<InvalidationGate>,
}

impl ClaimStore {
    pub fn new(gate: Arc<InvalidationGate>) -> Self {
        Self {
            claims: RwLock::new(HashMap::new()),
            suspend_depth: AtomicUsize::new(0),
            gate,
        }
    }

    /// Add or replace the claim on `territory`.
    pub fn add_claim(&self, territory: &str, guild_name: &str, guild_tag: &str) {
        let claim = GuildClaim::new(territory, guild_name, guild_tag);
        self.claims
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(territory.to_string(), claim);
        debug!("claim {territory} -> {guild_name} [{guild_tag}]");
        self.notify();
    }

    /// Remove the claim on `territory`. Returns whether one existed.
    pub fn remove_claim(&self, territory: &str) -> bool {
        let removed = self
            .claims
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(territory)
            .is_some();
        if removed {
            self.notify();
        }
        removed
    }

    /// Insert many claims under one write lock with redraws suspended,
    /// then request a single redraw. Returns the number of claims applied.
    pub fn add_claims_batch<I>(&self, claims: I) -> usize
    where
        I: IntoIterator<Item = GuildClaim>,
    {
        let suspension = self.suspend(false);
        let mut map = self.claims.write().unwrap_or_else(PoisonError::into_inner);
        let mut applied = 0usize;
        for claim in claims {
            map.insert(claim.territory.clone(), claim);
            applied += 1;
        }
        drop(map);
        drop(suspension);
        // Marked here rather than by the guard: an enclosing suspension may
        // already have been released while this batch waited on the lock.
        self.gate.mark_dirty();
        info!("batch applied {applied} claims");
        applied
    }

    /// Suspend per-claim redraw requests until the returned guard drops.
    /// Whichever guard is released last requests one redraw.
    pub fn suspend_redraws(&self) -> RedrawSuspension<'_> {
        self.suspend(true)
    }

    fn suspend(&self, mark_on_release: bool) -> RedrawSuspension<'_> {
        self.suspend_depth.fetch_add(1, Ordering::AcqRel);
        RedrawSuspension {
            store: self,
            mark_on_release,
        }
    }

    pub fn redraws_suspended(&self) -> bool {
        self.suspend_depth.load(Ordering::Acquire) > 0
    }

    pub fn claim(&self, territory: &str) -> Option<GuildClaim> {
        self.claims
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(territory)
            .cloned()
    }

    /// Territories claimed by one guild; the starting set of an edit session.
    pub fn claims_for_guild(&self, guild: &GuildKey) -> HashSet<String> {
        self.claims
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|claim| claim.guild_name == guild.name && claim.guild_tag == guild.tag)
            .map(|claim| claim.territory.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.claims
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self) {
        if !self.redraws_suspended() {
            self.gate.mark_dirty();
        }
    }
}

impl ClaimLookup for ClaimStore {
    fn claim_for(&self, territory: &str) -> Option<GuildKey> {
        self.claims
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(territory)
            .map(GuildClaim::guild)
    }
}

/// Guard returned by [`ClaimStore::suspend_redraws`].
#[must_use = "redraws resume as soon as the guard is dropped"]
pub struct RedrawSuspension<'a> {
    store: &'a ClaimStore,
    mark_on_release: bool,
}

impl Drop for RedrawSuspension<'_> {
    fn drop(&mut self) {
        let last = self.store.suspend_depth.fetch_sub(1, Ordering::AcqRel) == 1;
        if last && self.mark_on_release {
            self.store.gate.mark_dirty();
        }
    }
}

/// Guild colors keyed by `(name, tag)`.
#[derive(Debug)]
pub struct GuildRegistry {
    colors: RwLock<HashMap<GuildKey, Rgba>>,
    gate: Arc<InvalidationGate>,
}

impl GuildRegistry {
    pub fn new(gate: Arc<InvalidationGate>) -> Self {
        Self {
            colors: RwLock::new(HashMap::new()),
            gate,
        }
    }

    pub fn register(&self, name: &str, tag: &str, color: Rgba) {
        self.colors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(GuildKey::new(name, tag), color);
        self.gate.mark_dirty();
    }

    /// Register a guild from a hex string. Returns `false` and leaves the
    /// registry untouched when the color does not parse.
    pub fn load_hex(&self, name: &str, tag: &str, hex: &str) -> bool {
        match Rgba::from_hex(hex) {
            Some(color) => {
                self.register(name, tag, color);
                true
            }
            None => false,
        }
    }

    /// Replace the registry from a guild list. Guilds without a usable
    /// color get a deterministic one derived from their name.
    pub fn load_entries(&self, entries: &[GuildEntry]) -> usize {
        let mut loaded = HashMap::with_capacity(entries.len());
        for entry in entries {
            let parsed = entry.color.as_deref().and_then(Rgba::from_hex);
            if parsed.is_none()
                && let Some(raw) = entry.color.as_deref()
            {
                warn!("guild {} [{}] has invalid color {raw:?}", entry.name, entry.tag);
            }
            let color = parsed.unwrap_or_else(|| guild_color(&entry.name));
            loaded.insert(GuildKey::new(&entry.name, &entry.tag), color);
        }
        let count = loaded.len();
        *self.colors.write().unwrap_or_else(PoisonError::into_inner) = loaded;
        self.gate.mark_dirty();
        info!("loaded colors for {count} guilds");
        count
    }

    pub fn len(&self) -> usize {
        self.colors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GuildColorLookup for GuildRegistry {
    fn guild_color(&self, guild: &GuildKey) -> Option<Rgba> {
        self.colors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(guild)
            .copied()
    }
}
