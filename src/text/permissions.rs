//! Permission-set evaluation against an actor's badges.

use crate::event::ChatTags;
use crate::model::PermissionSet;

/// Does the actor described by `tags` satisfy `permissions`?
pub fn is_allowed(permissions: &PermissionSet, tags: &ChatTags) -> bool {
    if permissions.all {
        return true;
    }
    if permissions.broadcaster && tags.has_badge("broadcaster") {
        return true;
    }
    if permissions.mods && tags.has_badge("moderator") {
        return true;
    }
    if permissions.vips && tags.has_badge("vip") {
        return true;
    }
    if permissions.subs && (tags.has_badge("subscriber") || tags.has_badge("founder")) {
        return true;
    }

    let Some(login) = tags.login.as_deref().or(tags.display_name.as_deref()) else {
        return false;
    };
    permissions
        .users
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|u| !u.is_empty())
        .any(|u| u.eq_ignore_ascii_case(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_with_badge(badge: &str) -> ChatTags {
        let mut tags = ChatTags {
            login: Some("viewer".to_string()),
            ..ChatTags::default()
        };
        tags.badges.insert(badge.to_string(), "1".to_string());
        tags
    }

    #[test]
    fn everyone_allows_anonymous_actor() {
        assert!(is_allowed(&PermissionSet::everyone(), &ChatTags::default()));
    }

    #[test]
    fn role_flags_match_badges() {
        let mods_only = PermissionSet {
            mods: true,
            ..PermissionSet::default()
        };
        assert!(is_allowed(&mods_only, &tags_with_badge("moderator")));
        assert!(!is_allowed(&mods_only, &tags_with_badge("vip")));

        let subs = PermissionSet {
            subs: true,
            ..PermissionSet::default()
        };
        assert!(is_allowed(&subs, &tags_with_badge("founder")));
    }

    #[test]
    fn user_list_is_case_insensitive() {
        let listed = PermissionSet {
            users: "Alice, viewer".to_string(),
            ..PermissionSet::default()
        };
        assert!(is_allowed(&listed, &tags_with_badge("none")));

        let other = PermissionSet {
            users: "alice".to_string(),
            ..PermissionSet::default()
        };
        assert!(!is_allowed(&other, &tags_with_badge("none")));
    }
}
