//! Account service: registration, login, role assignment, deletion and the
//! profile view. Password hashing goes through the [`CredentialHasher`]
//! port; the scheme itself is an adapter concern.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use domains::{
    Comment, CommentStore, CredentialHasher, DomainError, Reply, Result, Role, User, UserDraft,
    UserStore, UserSummary,
};

use crate::policy;

/// A user together with everything they have written, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: UserSummary,
    pub comments: Vec<Comment>,
    pub replies: Vec<Reply>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    comments: Arc<dyn CommentStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        comments: Arc<dyn CommentStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self { users, comments, hasher }
    }

    /// Creates an account with the default `user` role. Registering an
    /// already-taken email is an explicit `Conflict`, never a silent no-op.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() {
            return Err(DomainError::Validation("name cannot be empty".into()));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("invalid email address".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("password cannot be empty".into()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(
                "an account with this email already exists".into(),
            ));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .insert(UserDraft {
                email,
                name: name.to_string(),
                password_hash,
                role: Role::User,
            })
            .await?;
        tracing::info!(user = user.id, "account registered");
        Ok(user)
    }

    /// Verifies credentials and returns the account. The error is the same
    /// for an unknown email and a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        let denied = || DomainError::PermissionDenied("invalid email or password".into());
        let user = self.users.find_by_email(&email).await?.ok_or_else(denied)?;
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(denied());
        }
        Ok(user)
    }

    /// Staff-only role assignment. Granting admin to oneself is rejected
    /// regardless of the actor's current role.
    pub async fn assign_role(&self, actor: &User, target_id: i64, role: Role) -> Result<User> {
        if !policy::can_assign_role(actor, target_id, role) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to assign this role".into(),
            ));
        }
        let mut target = self
            .users
            .get(target_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", target_id))?;
        self.users.set_role(target_id, role).await?;
        target.role = role;
        tracing::info!(user = target_id, role = %role, actor = actor.id, "role assigned");
        Ok(target)
    }

    /// Admin-only account deletion; cascades to the user's comments,
    /// replies and votes. Deleting one's own account is rejected.
    pub async fn delete_user(&self, actor: &User, target_id: i64) -> Result<()> {
        let target = self
            .users
            .get(target_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", target_id))?;
        if !policy::can_delete_user(actor, &target) {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to delete this user".into(),
            ));
        }
        self.users.delete(target_id).await?;
        tracing::info!(user = target_id, actor = actor.id, "account deleted");
        Ok(())
    }

    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>> {
        if !actor.role.is_staff() {
            return Err(DomainError::PermissionDenied(
                "you do not have permission to list users".into(),
            ));
        }
        self.users.list().await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserProfile> {
        let user = self.get(user_id).await?;
        let comments = self.comments.comments_by_author(user_id).await?;
        let replies = self.comments.replies_by_author(user_id).await?;
        Ok(UserProfile { user: UserSummary::from(&user), comments, replies })
    }
}
