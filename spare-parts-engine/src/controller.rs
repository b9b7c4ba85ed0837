//! Event-driven front door binding host callbacks to a staging session.
use serde::Serialize;

use crate::balance::BalanceCatalog;
use crate::commit::{IdAllocator, commit_session};
use crate::error::{CommitError, CommitStep, SalvageError};
use crate::host::{InputPhase, SalvageHost};
use crate::item::{ItemId, ItemRecord, SlotKey};
use crate::options::{ESCAPE_KEY, SalvageOptions};
use crate::resolver::Side;
use crate::review::{rejection_message, tooltip_hint};
use crate::staging::{SessionPhase, StagingSession};

/// Observable outcome of a controller transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SalvageEvent {
    Rejected {
        code: &'static str,
        message: String,
    },
    /// A new selection discarded the open session.
    Replaced,
    SessionOpened {
        candidates: usize,
        incompatible: usize,
        duplicates: usize,
        commit_blocked: bool,
    },
    ReviewStarted,
    Toggled {
        slot: SlotKey,
        side: Side,
    },
    Inspected,
    InspectionClosed,
    CommitBlocked {
        code: &'static str,
    },
    Committed {
        id: ItemId,
    },
    CommitFailed {
        step: CommitStep,
        message: String,
    },
    Cancelled,
}

/// Owns the salvage configuration and at most one staging session.
///
/// Every method runs synchronously inside a host callback.
#[derive(Debug, Clone)]
pub struct SalvageController {
    options: SalvageOptions,
    catalog: BalanceCatalog,
    ids: IdAllocator,
    session: Option<StagingSession>,
    events: Vec<SalvageEvent>,
}

impl SalvageController {
    #[must_use]
    pub fn new(options: SalvageOptions, catalog: BalanceCatalog, seed: u64) -> Self {
        Self {
            options,
            catalog,
            ids: IdAllocator::from_seed(seed),
            session: None,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &SalvageOptions {
        &self.options
    }

    #[must_use]
    pub const fn catalog(&self) -> &BalanceCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn session(&self) -> Option<&StagingSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::Idle, StagingSession::phase)
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SalvageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Comparison tooltip, extended with the salvage key when a pair is active.
    #[must_use]
    pub fn tooltip_hint<H: SalvageHost + ?Sized>(&self, host: &H, existing: &str) -> String {
        match host.selected_pair() {
            Some((first, second)) if first.id != second.id => {
                tooltip_hint(existing, &self.options)
            }
            _ => existing.to_string(),
        }
    }

    fn is_key(key: &str, binding: &str) -> bool {
        key.eq_ignore_ascii_case(binding)
    }

    /// Route a key event. Returns whether the engine consumed it.
    pub fn dispatch_on_input_event<H: SalvageHost + ?Sized>(
        &mut self,
        host: &mut H,
        key: &str,
        phase: InputPhase,
    ) -> bool {
        if phase != InputPhase::Pressed {
            return false;
        }
        match self.phase() {
            SessionPhase::Previewing => {
                if Self::is_key(key, &self.options.salvage_key) {
                    self.confirm(host);
                    true
                } else if Self::is_key(key, &self.options.inspect_key) {
                    self.inspect(host);
                    true
                } else if Self::is_key(key, ESCAPE_KEY) {
                    self.cancel();
                    true
                } else {
                    false
                }
            }
            // A dialog or the inspection view owns input.
            SessionPhase::Selecting | SessionPhase::Inspecting => false,
            SessionPhase::Idle | SessionPhase::Committed | SessionPhase::Cancelled => {
                if !Self::is_key(key, &self.options.salvage_key) {
                    return false;
                }
                let Some((first, second)) = host.selected_pair() else {
                    return false;
                };
                self.select_pair(host, first, second)
            }
        }
    }

    /// Stage a new pair, replacing any open session.
    ///
    /// Returns `false` only for silent rejections.
    pub fn select_pair<H: SalvageHost + ?Sized>(
        &mut self,
        host: &mut H,
        first: ItemRecord,
        second: ItemRecord,
    ) -> bool {
        if self.session.take().is_some() {
            log::debug!("new selection replaces the open session");
            self.events.push(SalvageEvent::Replaced);
        }

        let session = match StagingSession::open(first, second, &self.options, &self.catalog) {
            Ok(session) => session,
            Err(error) => return self.reject(host, &error),
        };

        let found = session.found();
        self.events.push(SalvageEvent::SessionOpened {
            candidates: session.candidates().len(),
            incompatible: found.incompatible.len(),
            duplicates: found.duplicate_count(),
            commit_blocked: session.commit_block().is_some(),
        });
        // A class mismatch replaces the summary; the review still opens after it.
        let message = match session.commit_block() {
            Some(block) => rejection_message(block, &*host),
            None => Some((found.title().to_string(), found.render(&*host))),
        };
        if let Some((title, body)) = message {
            host.present_message(&title, &body);
        }
        self.session = Some(session);
        true
    }

    fn reject<H: SalvageHost + ?Sized>(&mut self, host: &mut H, error: &SalvageError) -> bool {
        if error.is_silent() {
            log::debug!("ignored selection: {error}");
            return false;
        }
        log::warn!("salvage rejected: {error}");
        self.events.push(SalvageEvent::Rejected {
            code: error.code(),
            message: error.to_string(),
        });
        if let Some((title, body)) = rejection_message(error, &*host) {
            host.present_message(&title, &body);
        }
        true
    }

    fn present_review<H: SalvageHost + ?Sized>(&self, host: &mut H) {
        let Some(session) = &self.session else {
            return;
        };
        let dialog = session.review_dialog(&*host, &self.options);
        host.present_choice(&dialog);
    }

    /// Message dialog closed: open or restore the guided review.
    pub fn on_message_closed<H: SalvageHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.phase() {
            SessionPhase::Selecting => {
                if let Err(error) = session.begin_review() {
                    log::warn!("{error}");
                    return;
                }
                self.events.push(SalvageEvent::ReviewStarted);
                self.present_review(host);
            }
            SessionPhase::Previewing => self.present_review(host),
            SessionPhase::Idle
            | SessionPhase::Inspecting
            | SessionPhase::Committed
            | SessionPhase::Cancelled => {}
        }
    }

    /// Review option picked: toggle that candidate and re-present focused on it.
    pub fn on_choice_selected<H: SalvageHost + ?Sized>(&mut self, host: &mut H, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(slot) = session.candidates().get(index).map(|candidate| candidate.slot) else {
            log::warn!("review option {index} is out of range");
            return;
        };
        match session.toggle(slot) {
            Ok(side) => {
                self.events.push(SalvageEvent::Toggled { slot, side });
                self.present_review(host);
            }
            Err(error) => log::warn!("toggle ignored: {error}"),
        }
    }

    /// Review dialog dismissed with Escape.
    pub fn on_choice_cancelled<H: SalvageHost + ?Sized>(&mut self, _host: &mut H) {
        self.cancel();
    }

    pub fn on_inspection_closed<H: SalvageHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(error) = session.end_inspection() {
            log::warn!("{error}");
            return;
        }
        self.events.push(SalvageEvent::InspectionClosed);
        self.present_review(host);
    }

    fn inspect<H: SalvageHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.begin_inspection() {
            Ok(preview) => {
                self.events.push(SalvageEvent::Inspected);
                host.present_inspection(&preview);
            }
            Err(error) => log::warn!("{error}"),
        }
    }

    fn cancel(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
            self.events.push(SalvageEvent::Cancelled);
        }
    }

    fn confirm<H: SalvageHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match commit_session(session, host.inventory(), &mut self.ids) {
            Ok(id) => {
                self.session = None;
                self.events.push(SalvageEvent::Committed { id });
                host.dismiss_comparison();
            }
            Err(CommitError::Blocked(error)) => {
                log::warn!("commit blocked: {error}");
                self.events.push(SalvageEvent::CommitBlocked { code: error.code() });
                if let Some((title, body)) = rejection_message(&error, &*host) {
                    host.present_message(&title, &body);
                }
            }
            Err(CommitError::Host { step, source }) => {
                log::error!("inventory failed during {step}: {source}");
                self.session = None;
                self.events.push(SalvageEvent::CommitFailed {
                    step,
                    message: source.to_string(),
                });
            }
        }
    }
}
