//! In-memory port implementations and a test fixture for driving the
//! transfer workflow without a database.
//!
//! The store and transactor share one world behind a mutex, and every
//! transition checks-and-writes while holding the lock, mirroring the
//! compare-and-set semantics of the Postgres implementations.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use custody_core::error::AppError;
use custody_core::result::AppResult;
use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_entity::asset::Asset;
use custody_entity::notification::NotificationKind;
use custody_entity::transfer::{
    CompletedTransfer, NewTransferRequest, StageDecision, TransferHistoryEntry, TransferKind,
    TransferRequest, TransferStatus,
};
use custody_entity::user::{User, UserRole, UserStatus};
use custody_service::context::ActorContext;
use custody_service::ports::{
    AssetRegistry, AuditPort, IdentityPort, NotificationPort, OwnershipTransactor, SlipNumberPort,
    TransferStore,
};
use custody_service::transfer::TransferWorkflowService;

/// Everything the fakes share.
#[derive(Default)]
pub struct World {
    pub users: HashMap<Uuid, User>,
    pub assets: HashMap<Uuid, Asset>,
    pub departments: HashMap<Uuid, String>,
    pub requests: Vec<TransferRequest>,
    pub history: Vec<TransferHistoryEntry>,
}

pub type SharedWorld = Arc<Mutex<World>>;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
}

// ── Identity ─────────────────────────────────────────────────────

pub struct InMemoryIdentity {
    world: SharedWorld,
}

#[async_trait]
impl IdentityPort for InMemoryIdentity {
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.world.lock().unwrap().users.get(&id).cloned())
    }

    async fn active_supervisors(&self) -> AppResult<Vec<User>> {
        let world = self.world.lock().unwrap();
        let mut supervisors: Vec<User> = world
            .users
            .values()
            .filter(|u| u.role == UserRole::Supervisor && u.is_active())
            .cloned()
            .collect();
        supervisors.sort_by_key(|u| u.created_at);
        Ok(supervisors)
    }
}

// ── Assets ───────────────────────────────────────────────────────

pub struct InMemoryAssets {
    world: SharedWorld,
}

#[async_trait]
impl AssetRegistry for InMemoryAssets {
    async fn get_asset(&self, id: Uuid) -> AppResult<Option<Asset>> {
        Ok(self.world.lock().unwrap().assets.get(&id).cloned())
    }
}

// ── Transfer store ───────────────────────────────────────────────

pub struct InMemoryStore {
    world: SharedWorld,
}

#[async_trait]
impl TransferStore for InMemoryStore {
    async fn insert_request(&self, request: NewTransferRequest) -> AppResult<TransferRequest> {
        let mut world = self.world.lock().unwrap();
        if world
            .requests
            .iter()
            .any(|r| r.asset_id == request.asset_id && r.status.is_active())
        {
            return Err(AppError::conflict(
                "Asset already has an active transfer request",
            ));
        }
        let row = TransferRequest {
            id: Uuid::new_v4(),
            asset_id: request.asset_id,
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            from_department_id: request.from_department_id,
            to_department_id: request.to_department_id,
            reason: request.reason,
            status: TransferStatus::PendingHod,
            hod_id: request.hod_id,
            supervisor_id: request.supervisor_id,
            requested_by: request.requested_by,
            slip_number: request.slip_number,
            hod_action: None,
            hod_comments: None,
            hod_action_by: None,
            hod_action_at: None,
            supervisor_action: None,
            supervisor_comments: None,
            supervisor_action_by: None,
            supervisor_action_at: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        world.requests.push(row.clone());
        Ok(row)
    }

    async fn get_request(&self, id: Uuid) -> AppResult<Option<TransferRequest>> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_for_actor(
        &self,
        actor: &ActorContext,
        status: Option<TransferStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferRequest>> {
        let world = self.world.lock().unwrap();
        let mut visible: Vec<TransferRequest> = world
            .requests
            .iter()
            .filter(|r| {
                let party = r.requested_by == actor.user_id
                    || r.from_user_id == actor.user_id
                    || r.to_user_id == actor.user_id;
                match actor.role {
                    UserRole::Admin => true,
                    UserRole::Supervisor => {
                        r.status == TransferStatus::PendingSupervisor || party
                    }
                    UserRole::Hod => r.hod_id == Some(actor.user_id) || party,
                    UserRole::Employee => party,
                }
            })
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = visible.len() as u64;
        let items: Vec<TransferRequest> = visible
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn record_hod_decision(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest> {
        let mut world = self.world.lock().unwrap();
        let request = world
            .requests
            .iter_mut()
            .find(|r| r.id == request_id && r.status == TransferStatus::PendingHod)
            .ok_or_else(|| {
                AppError::invalid_transition("Request is no longer awaiting HoD approval")
            })?;
        request.status = match decision.outcome {
            custody_entity::transfer::DecisionOutcome::Approved => {
                TransferStatus::PendingSupervisor
            }
            custody_entity::transfer::DecisionOutcome::Rejected => TransferStatus::Rejected,
        };
        request.hod_action = Some(decision.outcome);
        request.hod_comments = decision.comments.clone();
        request.hod_action_by = Some(decision.decided_by);
        request.hod_action_at = Some(decision.decided_at);
        Ok(request.clone())
    }

    async fn record_supervisor_rejection(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<TransferRequest> {
        let mut world = self.world.lock().unwrap();
        let request = world
            .requests
            .iter_mut()
            .find(|r| r.id == request_id && r.status == TransferStatus::PendingSupervisor)
            .ok_or_else(|| {
                AppError::invalid_transition("Request is no longer awaiting supervisor approval")
            })?;
        request.status = TransferStatus::Rejected;
        request.supervisor_action = Some(decision.outcome);
        request.supervisor_comments = decision.comments.clone();
        request.supervisor_action_by = Some(decision.decided_by);
        request.supervisor_action_at = Some(decision.decided_at);
        Ok(request.clone())
    }

    async fn history_for_asset(
        &self,
        asset_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransferHistoryEntry>> {
        let world = self.world.lock().unwrap();
        let mut entries: Vec<TransferHistoryEntry> = world
            .history
            .iter()
            .filter(|e| e.asset_id == asset_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.transferred_at.cmp(&a.transferred_at));
        let total = entries.len() as u64;
        let items: Vec<TransferHistoryEntry> = entries
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn count_active_for_supervisor(&self, supervisor_id: Uuid) -> AppResult<u64> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.supervisor_id == Some(supervisor_id) && r.status.is_active())
            .count() as u64)
    }

    async fn slip_exists(&self, slip_number: &str) -> AppResult<bool> {
        Ok(self
            .world
            .lock()
            .unwrap()
            .requests
            .iter()
            .any(|r| r.slip_number == slip_number))
    }
}

// ── Ownership transactor ─────────────────────────────────────────

/// Applies completion as one unit under the world lock, the same
/// all-or-nothing shape as the Postgres transaction. Can be toggled to
/// fail before writing anything.
pub struct InMemoryTransactor {
    world: SharedWorld,
    fail: AtomicBool,
}

impl InMemoryTransactor {
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OwnershipTransactor for InMemoryTransactor {
    async fn complete_transfer(
        &self,
        request_id: Uuid,
        decision: &StageDecision,
    ) -> AppResult<CompletedTransfer> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("Transaction failed to commit"));
        }

        let mut world = self.world.lock().unwrap();

        let request = {
            let request = world
                .requests
                .iter_mut()
                .find(|r| r.id == request_id && r.status == TransferStatus::PendingSupervisor)
                .ok_or_else(|| {
                    AppError::invalid_transition(
                        "Request is no longer awaiting supervisor approval",
                    )
                })?;
            request.status = TransferStatus::Completed;
            request.supervisor_action = Some(decision.outcome);
            request.supervisor_comments = decision.comments.clone();
            request.supervisor_action_by = Some(decision.decided_by);
            request.supervisor_action_at = Some(decision.decided_at);
            request.completed_at = Some(decision.decided_at);
            request.clone()
        };

        let asset = {
            let asset = world
                .assets
                .get_mut(&request.asset_id)
                .ok_or_else(|| AppError::not_found("Asset not found"))?;
            asset.current_holder_id = Some(request.to_user_id);
            asset.department_id = request.to_department_id;
            asset.updated_at = decision.decided_at;
            asset.clone()
        };

        let user_name = |world: &World, id: Uuid| -> String {
            world
                .users
                .get(&id)
                .map(|u| u.emp_name.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        let department_name = |world: &World, id: Option<Uuid>| -> String {
            id.and_then(|d| world.departments.get(&d).cloned())
                .unwrap_or_else(|| "Unknown".to_string())
        };

        let entry = TransferHistoryEntry {
            id: Uuid::new_v4(),
            asset_id: request.asset_id,
            transfer_request_id: request.id,
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            from_department_id: request.from_department_id,
            to_department_id: request.to_department_id,
            from_user_name: user_name(&world, request.from_user_id),
            to_user_name: user_name(&world, request.to_user_id),
            from_department_name: department_name(&world, request.from_department_id),
            to_department_name: department_name(&world, request.to_department_id),
            transfer_kind: TransferKind::classify(
                request.from_department_id,
                request.to_department_id,
            ),
            slip_number: request.slip_number.clone(),
            remarks: decision.comments.clone(),
            transferred_at: decision.decided_at,
        };
        world.history.push(entry.clone());

        Ok(CompletedTransfer {
            request,
            history: entry,
            asset,
        })
    }
}

// ── Slip numbers ─────────────────────────────────────────────────

/// Deterministic sequential slips: `TS-20240101-0001`, `-0002`, ...
pub struct SequentialSlips {
    counter: AtomicU32,
}

#[async_trait]
impl SlipNumberPort for SequentialSlips {
    async fn generate_unique_slip(&self) -> AppResult<String> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("TS-20240101-{n:04}"))
    }
}

// ── Side channels ────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingNotifications {
    pub sent: Mutex<Vec<SentNotification>>,
    fail: AtomicBool,
}

impl RecordingNotifications {
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_to(&self, user_id: Uuid) -> Vec<SentNotification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifications {
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        subject: &str,
        body: &str,
    ) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("Notification store unavailable"));
        }
        self.sent.lock().unwrap().push(SentNotification {
            user_id,
            kind,
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub actor_id: Uuid,
    pub action: String,
    pub entity_id: Uuid,
}

#[derive(Default)]
pub struct RecordingAudit {
    pub records: Mutex<Vec<AuditRecord>>,
}

impl RecordingAudit {
    pub fn actions(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.action.clone())
            .collect()
    }
}

#[async_trait]
impl AuditPort for RecordingAudit {
    async fn record(
        &self,
        actor_id: Uuid,
        action: &str,
        _entity_type: &str,
        entity_id: Uuid,
        _description: &str,
    ) -> AppResult<()> {
        self.records.lock().unwrap().push(AuditRecord {
            actor_id,
            action: action.to_string(),
            entity_id,
        });
        Ok(())
    }
}

// ── Fixture ──────────────────────────────────────────────────────

/// A complete workflow wired to in-memory ports.
pub struct TestEnv {
    pub world: SharedWorld,
    pub notifications: Arc<RecordingNotifications>,
    pub audit: Arc<RecordingAudit>,
    pub transactor: Arc<InMemoryTransactor>,
    pub workflow: TransferWorkflowService,
    user_seq: AtomicU32,
}

impl TestEnv {
    pub fn new() -> Self {
        let world: SharedWorld = Arc::new(Mutex::new(World::default()));
        let notifications = Arc::new(RecordingNotifications::default());
        let audit = Arc::new(RecordingAudit::default());
        let transactor = Arc::new(InMemoryTransactor {
            world: world.clone(),
            fail: AtomicBool::new(false),
        });
        let workflow = TransferWorkflowService::new(
            Arc::new(InMemoryIdentity {
                world: world.clone(),
            }),
            Arc::new(InMemoryAssets {
                world: world.clone(),
            }),
            Arc::new(InMemoryStore {
                world: world.clone(),
            }),
            transactor.clone(),
            Arc::new(SequentialSlips {
                counter: AtomicU32::new(0),
            }),
            notifications.clone(),
            audit.clone(),
        );
        Self {
            world,
            notifications,
            audit,
            transactor,
            workflow,
            user_seq: AtomicU32::new(0),
        }
    }

    pub fn add_department(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.world
            .lock()
            .unwrap()
            .departments
            .insert(id, name.to_string());
        id
    }

    /// Register a user. Creation times increase with registration order
    /// so router tie-breaks are deterministic.
    pub fn add_user(
        &self,
        name: &str,
        role: UserRole,
        department_id: Option<Uuid>,
        hod_id: Option<Uuid>,
    ) -> Uuid {
        let seq = self.user_seq.fetch_add(1, Ordering::SeqCst);
        let created_at = base_time() + Duration::seconds(seq as i64);
        let id = Uuid::new_v4();
        let user = User {
            id,
            username: name.to_lowercase().replace(' ', "."),
            emp_name: name.to_string(),
            email: None,
            role,
            status: UserStatus::Active,
            department_id,
            hod_id,
            created_at,
            updated_at: created_at,
        };
        self.world.lock().unwrap().users.insert(id, user);
        id
    }

    pub fn deactivate_user(&self, id: Uuid) {
        if let Some(user) = self.world.lock().unwrap().users.get_mut(&id) {
            user.status = UserStatus::Inactive;
        }
    }

    pub fn add_asset(
        &self,
        serial: &str,
        description: &str,
        holder: Option<Uuid>,
        department_id: Option<Uuid>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let asset = Asset {
            id,
            serial_number: serial.to_string(),
            description: description.to_string(),
            current_holder_id: holder,
            department_id,
            created_at: base_time(),
            updated_at: base_time(),
        };
        self.world.lock().unwrap().assets.insert(id, asset);
        id
    }

    pub fn ctx(&self, user_id: Uuid) -> ActorContext {
        let world = self.world.lock().unwrap();
        ActorContext::from_user(&world.users[&user_id])
    }

    pub fn asset(&self, id: Uuid) -> Asset {
        self.world.lock().unwrap().assets[&id].clone()
    }

    pub fn request(&self, id: Uuid) -> TransferRequest {
        self.world
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .expect("request exists")
    }

    pub fn history_len(&self) -> usize {
        self.world.lock().unwrap().history.len()
    }
}
