//! In-memory `UserApi` for accessor tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::api::{ApiError, UserApi};
use crate::models::{
    ApiResponse, CreateUserRequest, UpdateUserRequest, User, UserStats, UserStatus,
};

pub(crate) fn sample_user(id: i64) -> User {
    User {
        id,
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        phone: "555-0100".to_string(),
        avatar: None,
        status: UserStatus::Active,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct MockApi {
    users: Mutex<Vec<User>>,
    log: Mutex<Vec<String>>,
    failing_ids: Mutex<HashSet<i64>>,
    fail_reads: AtomicBool,
    pending_read_failures: AtomicU32,
}

impl MockApi {
    pub(crate) fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Default::default()
        }
    }

    /// Every read fails until switched off.
    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// The next `n` reads fail.
    pub(crate) fn fail_next_reads(&self, n: u32) {
        self.pending_read_failures.store(n, Ordering::SeqCst);
    }

    /// Mutations touching `id` fail.
    pub(crate) fn fail_id(&self, id: i64) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    pub(crate) fn calls(&self, name: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.split(':').next() == Some(name))
            .count()
    }

    pub(crate) fn call_log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn user(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn check_read(&self) -> Result<(), ApiError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let pending = self.pending_read_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.pending_read_failures.store(pending - 1, Ordering::SeqCst);
            return Err(ApiError::Server {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(())
    }

    fn check_mutation(&self, id: i64) -> Result<(), ApiError> {
        if self.failing_ids.lock().unwrap().contains(&id) {
            return Err(ApiError::Server {
                status: 500,
                body: format!("cannot modify {}", id),
            });
        }
        Ok(())
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::NotFound(format!("user {}", id))
    }
}

impl UserApi for MockApi {
    async fn get_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.record("get_users".to_string());
        self.check_read()?;
        Ok(ApiResponse::success(self.users.lock().unwrap().clone(), 200))
    }

    async fn get_user(&self, id: i64) -> Result<ApiResponse<User>, ApiError> {
        self.record(format!("get_user:{}", id));
        self.check_read()?;
        let user = self.user(id).ok_or_else(|| Self::not_found(id))?;
        Ok(ApiResponse::success(user, 200))
    }

    async fn create_user(&self, data: &CreateUserRequest) -> Result<ApiResponse<User>, ApiError> {
        self.record("create_user".to_string());
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name: data.name.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            ..sample_user(id)
        };
        users.push(user.clone());
        Ok(ApiResponse::success(user, 201))
    }

    async fn update_user(&self, data: &UpdateUserRequest) -> Result<ApiResponse<User>, ApiError> {
        self.record(format!("update_user:{}", data.id));
        self.check_mutation(data.id)?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == data.id)
            .ok_or_else(|| Self::not_found(data.id))?;
        if let Some(ref name) = data.name {
            user.name = name.clone();
        }
        if let Some(ref email) = data.email {
            user.email = email.clone();
        }
        if let Some(ref phone) = data.phone {
            user.phone = phone.clone();
        }
        if let Some(status) = data.status {
            user.status = status;
        }
        if data.avatar.is_some() {
            user.avatar = data.avatar.clone();
        }
        Ok(ApiResponse::success(user.clone(), 200))
    }

    async fn delete_user(&self, id: i64) -> Result<ApiResponse<()>, ApiError> {
        self.record(format!("delete_user:{}", id));
        self.check_mutation(id)?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(ApiResponse::success((), 204))
    }

    async fn search_users(&self, query: &str) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.record(format!("search_users:{}", query));
        self.check_read()?;
        let query = query.to_lowercase();
        let found = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        Ok(ApiResponse::success(found, 200))
    }

    async fn get_user_stats(&self) -> Result<ApiResponse<UserStats>, ApiError> {
        self.record("get_user_stats".to_string());
        self.check_read()?;
        let users = self.users.lock().unwrap();
        let active = users.iter().filter(|u| u.status == UserStatus::Active).count() as u64;
        let stats = UserStats {
            total: users.len() as u64,
            active,
            inactive: users.len() as u64 - active,
        };
        Ok(ApiResponse::success(stats, 200))
    }
}
