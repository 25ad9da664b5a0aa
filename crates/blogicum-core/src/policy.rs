//! Ownership policy for owner-only actions.

use crate::domain::{Comment, Post};
use crate::error::DomainError;

/// A resource with a single owning user.
pub trait Owned {
    const ENTITY: &'static str;

    fn id(&self) -> i32;
    fn owner_id(&self) -> i32;
}

impl Owned for Post {
    const ENTITY: &'static str = "post";

    fn id(&self) -> i32 {
        self.id
    }

    fn owner_id(&self) -> i32 {
        self.author_id
    }
}

impl Owned for Comment {
    const ENTITY: &'static str = "comment";

    fn id(&self) -> i32 {
        self.id
    }

    fn owner_id(&self) -> i32 {
        self.author_id
    }
}

/// Returns true when `actor` may edit or delete `resource`.
pub fn can_modify<R: Owned>(actor: i32, resource: &R) -> bool {
    actor == resource.owner_id()
}

/// Same as [`can_modify`], as a `Result` for `?` in handlers.
pub fn authorize<R: Owned>(actor: i32, resource: &R) -> Result<(), DomainError> {
    if can_modify(actor, resource) {
        Ok(())
    } else {
        Err(DomainError::NotOwner {
            entity_type: R::ENTITY,
            id: resource.id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn comment(author_id: i32) -> Comment {
        Comment {
            id: 3,
            text: "Nice".to_string(),
            post_id: 5,
            author_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn owner_is_allowed() {
        assert!(can_modify(10, &comment(10)));
        assert!(authorize(10, &comment(10)).is_ok());
    }

    #[test]
    fn stranger_is_denied() {
        assert!(!can_modify(11, &comment(10)));
        let err = authorize(11, &comment(10)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotOwner {
                entity_type: "comment",
                id: 3
            }
        ));
    }

    #[test]
    fn post_owner_is_its_author() {
        let now = Utc::now();
        let post = Post {
            id: 5,
            title: "t".to_string(),
            text: "x".to_string(),
            image: None,
            pub_date: now,
            is_published: true,
            author_id: 1,
            category_id: None,
            location_id: None,
            created_at: now,
        };
        assert!(can_modify(1, &post));
        assert!(!can_modify(2, &post));
    }
}
