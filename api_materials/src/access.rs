use common::error::{AppError, Res};

/// Actions a viewer can attempt on a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Moderator,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Course,
    Lesson,
}

/// Outcome of an authorization check. `NotFound` hides the resource's
/// existence; `Forbidden` admits it exists but refuses access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
    NotFound,
}

/// The single authorization table for courses and lessons.
///
/// - Moderators may list, retrieve and update anything, but never create or
///   destroy - not even materials they happen to own.
/// - Regular users may do everything with their own materials and nothing
///   with anyone else's.
/// - Listing is always allowed; the queryset is filtered to own materials
///   for regular users elsewhere.
///
/// Denied access to a foreign Course surfaces as `NotFound` while the same
/// situation on a Lesson surfaces as `Forbidden`. The asymmetry is
/// deliberate and covered by tests; do not unify the two.
pub fn decide(resource: Resource, role: Role, owns: bool, action: Action) -> Decision {
    let hidden = match resource {
        Resource::Course => Decision::NotFound,
        Resource::Lesson => Decision::Forbidden,
    };

    match action {
        Action::List => Decision::Allow,
        Action::Create => match role {
            Role::Moderator => Decision::Forbidden,
            Role::Regular => Decision::Allow,
        },
        Action::Retrieve | Action::Update => {
            if role == Role::Moderator || owns {
                Decision::Allow
            } else {
                hidden
            }
        }
        Action::Destroy => match role {
            Role::Moderator => Decision::Forbidden,
            Role::Regular => {
                if owns {
                    Decision::Allow
                } else {
                    hidden
                }
            }
        },
    }
}

/// Evaluates the table and converts a denial into the matching error.
pub fn authorize(resource: Resource, role: Role, owns: bool, action: Action) -> Res<()> {
    match decide(resource, role, owns, action) {
        Decision::Allow => Ok(()),
        Decision::Forbidden => Err(AppError::Forbidden(
            "You don't have permission to perform this action".to_string(),
        )),
        Decision::NotFound => Err(AppError::NotFound("Course not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::{Action::*, Decision::*, Resource::*, Role::*};

    #[test]
    fn foreign_course_is_hidden_as_absent() {
        for action in [Retrieve, Update, Destroy] {
            assert_eq!(decide(Course, Regular, false, action), NotFound);
        }
    }

    #[test]
    fn foreign_lesson_is_explicitly_forbidden() {
        for action in [Retrieve, Update, Destroy] {
            assert_eq!(decide(Lesson, Regular, false, action), Forbidden);
        }
    }

    #[test]
    fn owner_has_full_control() {
        for resource in [Course, Lesson] {
            for action in [List, Retrieve, Create, Update, Destroy] {
                assert_eq!(decide(resource, Regular, true, action), Allow);
            }
        }
    }

    #[test]
    fn moderator_reads_and_updates_anything() {
        for resource in [Course, Lesson] {
            for action in [List, Retrieve, Update] {
                assert_eq!(decide(resource, Moderator, false, action), Allow);
            }
        }
    }

    #[test]
    fn moderator_never_creates_or_destroys() {
        for resource in [Course, Lesson] {
            // ownership does not override the role restriction
            for owns in [false, true] {
                assert_eq!(decide(resource, Moderator, owns, Create), Forbidden);
                assert_eq!(decide(resource, Moderator, owns, Destroy), Forbidden);
            }
        }
    }

    #[test]
    fn listing_is_always_allowed() {
        for resource in [Course, Lesson] {
            for role in [Moderator, Regular] {
                assert_eq!(decide(resource, role, false, List), Allow);
            }
        }
    }
}
