//! # Access Policy
//!
//! Pure predicates over already-authenticated actors. Every mutating
//! service calls the relevant predicate before touching the store; a
//! failing check surfaces as `PermissionDenied` with no side effects.
//!
//! The presence of a `&User` means the identity collaborator has already
//! verified the actor; anonymous callers never reach these functions.

use domains::{Comment, Reply, Role, User};

/// Movie catalog management (create/edit/delete) is staff-only.
pub fn can_manage_movie(user: &User) -> bool {
    user.role.is_staff()
}

/// Only admins delete accounts, and never their own.
pub fn can_delete_user(actor: &User, target: &User) -> bool {
    actor.role == Role::Admin && actor.id != target.id
}

/// Staff may assign roles, but granting admin to oneself is always
/// rejected regardless of the actor's role.
pub fn can_assign_role(actor: &User, target_id: i64, role: Role) -> bool {
    actor.role.is_staff() && !(role == Role::Admin && actor.id == target_id)
}

/// The author may edit or delete their own comment; staff may act on any.
pub fn can_modify_comment(actor: &User, comment: &Comment) -> bool {
    actor.id == comment.author_id || actor.role.is_staff()
}

/// Same rule as comments: author or staff. Moderators are deliberately
/// included (see DESIGN.md on the divergent upstream variants).
pub fn can_modify_reply(actor: &User, reply: &Reply) -> bool {
    actor.id == reply.author_id || actor.role.is_staff()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            email: format!("u{id}@example.com"),
            name: format!("user-{id}"),
            password_hash: String::new(),
            role,
        }
    }

    fn comment(author_id: i64) -> Comment {
        Comment {
            id: 1,
            movie_id: 1,
            author_id,
            parent_id: None,
            text: "fine film".into(),
            user_rating: Some(8.0),
            likes_count: 0,
            dislikes_count: 0,
            created_at: Utc::now(),
        }
    }

    fn reply(author_id: i64) -> Reply {
        Reply {
            id: 1,
            comment_id: 1,
            parent_id: None,
            author_id,
            text: "agreed".into(),
            likes_count: 0,
            dislikes_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn movie_management_is_staff_only() {
        assert!(!can_manage_movie(&user(1, Role::User)));
        assert!(can_manage_movie(&user(1, Role::Moderator)));
        assert!(can_manage_movie(&user(1, Role::Admin)));
    }

    #[test]
    fn user_deletion_is_admin_only_and_never_self() {
        let admin = user(1, Role::Admin);
        assert!(can_delete_user(&admin, &user(2, Role::User)));
        assert!(!can_delete_user(&admin, &user(1, Role::Admin)));
        assert!(!can_delete_user(&user(1, Role::Moderator), &user(2, Role::User)));
        assert!(!can_delete_user(&user(1, Role::User), &user(2, Role::User)));
    }

    #[test]
    fn role_assignment_rejects_self_promotion_to_admin() {
        let moderator = user(3, Role::Moderator);
        assert!(can_assign_role(&moderator, 4, Role::Moderator));
        assert!(can_assign_role(&moderator, 4, Role::Admin));
        assert!(!can_assign_role(&moderator, 3, Role::Admin));
        // Even an existing admin cannot re-grant admin to themselves.
        assert!(!can_assign_role(&user(5, Role::Admin), 5, Role::Admin));
        // Demoting or re-confirming oneself below admin is allowed.
        assert!(can_assign_role(&user(5, Role::Admin), 5, Role::Moderator));
        assert!(!can_assign_role(&user(6, Role::User), 7, Role::Moderator));
    }

    #[test]
    fn comments_are_modifiable_by_author_or_staff() {
        assert!(can_modify_comment(&user(9, Role::User), &comment(9)));
        assert!(!can_modify_comment(&user(8, Role::User), &comment(9)));
        assert!(can_modify_comment(&user(8, Role::Moderator), &comment(9)));
        assert!(can_modify_comment(&user(8, Role::Admin), &comment(9)));
    }

    #[test]
    fn replies_follow_the_same_rule_as_comments() {
        assert!(can_modify_reply(&user(9, Role::User), &reply(9)));
        assert!(!can_modify_reply(&user(8, Role::User), &reply(9)));
        assert!(can_modify_reply(&user(8, Role::Moderator), &reply(9)));
    }
}
