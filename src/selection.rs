//! Role selection logic, independent of the gateway.
//!
//! Turns a guild's managed role list into menu pages and works out which
//! roles to grant or revoke when a member submits one of those menus.

use std::collections::HashSet;
use serenity::model::id::{GuildId, RoleId};

use crate::storage::parse_role_id;

/// Discord's option limit for a single select menu.
pub const MAX_OPTIONS_PER_PAGE: usize = 25;

/// Discord's action row limit for a single message.
pub const MAX_MENUS_PER_MESSAGE: usize = 5;

const CUSTOM_ID_PREFIX: &str = "roleSelection";

/// Component number used by the "Get roles..." button; menus count up from 1.
pub const BUTTON_NUMBER: usize = 0;

pub fn custom_id(guild_id: GuildId, number: usize) -> String {
    format!("{}-{}-{}", CUSTOM_ID_PREFIX, guild_id, number)
}

/// Splits a custom id produced by [`custom_id`]. Anything else is not ours.
pub fn parse_custom_id(custom_id: &str) -> Option<(GuildId, usize)> {
    let rest = custom_id.strip_prefix(CUSTOM_ID_PREFIX)?.strip_prefix('-')?;
    let (guild, number) = rest.split_once('-')?;
    let guild = guild.parse::<u64>().ok().filter(|id| *id != 0)?;
    Some((GuildId::new(guild), number.parse().ok()?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedRole {
    pub id: RoleId,
    pub name: String,
}

impl ManagedRole {
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// Result of matching the stored ids against the guild's live roles.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolved {
    pub roles: Vec<ManagedRole>,
    /// Ids that no longer point at a role and should be pruned.
    pub stale: Vec<String>,
}

/// Looks every stored id up with `lookup`, keeping list order.
pub fn resolve_roles<F>(ids: &[String], mut lookup: F) -> Resolved
where
    F: FnMut(RoleId) -> Option<String>,
{
    let mut resolved = Resolved::default();
    for raw in ids {
        match parse_role_id(raw).and_then(|id| lookup(id).map(|name| ManagedRole::new(id, name))) {
            Some(role) => resolved.roles.push(role),
            None => resolved.stale.push(raw.clone()),
        }
    }
    resolved
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOption {
    pub role: ManagedRole,
    /// Pre-selected because the member already holds the role.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPage {
    /// 1-based, also the component number in the custom id.
    pub number: usize,
    pub total: usize,
    pub options: Vec<SelectionOption>,
}

impl SelectionPage {
    pub fn placeholder(&self) -> String {
        format!("Select a role (Page {} of {})", self.number, self.total)
    }
}

pub fn paginate(roles: &[ManagedRole], held: &HashSet<RoleId>) -> Vec<SelectionPage> {
    let total = roles.len().div_ceil(MAX_OPTIONS_PER_PAGE);
    roles
        .chunks(MAX_OPTIONS_PER_PAGE)
        .enumerate()
        .map(|(index, chunk)| SelectionPage {
            number: index + 1,
            total,
            options: chunk
                .iter()
                .map(|role| SelectionOption {
                    role: role.clone(),
                    selected: held.contains(&role.id),
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleChange {
    Grant(ManagedRole),
    Revoke(ManagedRole),
}

/// Orders the grants and revokes for one submitted menu.
///
/// `options` are the roles on the submitted page, `managed` is the whole
/// resolved list across every page. Choosing a role revokes every other
/// managed role the member holds right after the grant, so the member never
/// holds two at once, even when the other role sits on a different page.
pub fn plan_selection(
    options: &[ManagedRole],
    managed: &[ManagedRole],
    held: &HashSet<RoleId>,
    chosen: &[String],
) -> Vec<RoleChange> {
    let mut held = held.clone();
    let mut plan = Vec::new();

    for role in options {
        let is_chosen = chosen.iter().any(|value| *value == role.id.to_string());

        if !is_chosen {
            if held.remove(&role.id) {
                plan.push(RoleChange::Revoke(role.clone()));
            }
            continue;
        }

        if held.insert(role.id) {
            plan.push(RoleChange::Grant(role.clone()));
        }

        for other in managed.iter().filter(|other| other.id != role.id) {
            if held.remove(&other.id) {
                plan.push(RoleChange::Revoke(other.clone()));
            }
        }
    }

    plan
}

/// Role names changed by an applied plan, in the order they changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SelectionSummary {
    pub fn record(&mut self, change: &RoleChange) {
        match change {
            RoleChange::Grant(role) => self.added.push(role.name.clone()),
            RoleChange::Revoke(role) => self.removed.push(role.name.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn message(&self) -> String {
        if self.is_empty() {
            return "No role changes have been made.".to_string();
        }

        let mut sections = Vec::new();
        if !self.removed.is_empty() {
            sections.push(bullet_list("**Removed the following roles:**", &self.removed));
        }
        if !self.added.is_empty() {
            sections.push(bullet_list("**Added the following roles:**", &self.added));
        }
        sections.join("\n")
    }
}

fn bullet_list(heading: &str, names: &[String]) -> String {
    let mut out = format!("{}\n", heading);
    for name in names {
        out.push_str(&format!("    • {}\n", name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64) -> ManagedRole {
        ManagedRole::new(RoleId::new(id), format!("role-{}", id))
    }

    fn roles(n: u64) -> Vec<ManagedRole> {
        (1..=n).map(role).collect()
    }

    fn held(ids: &[u64]) -> HashSet<RoleId> {
        ids.iter().copied().map(RoleId::new).collect()
    }

    fn chosen(id: u64) -> Vec<String> {
        vec![id.to_string()]
    }

    #[test]
    fn custom_id_round_trips() {
        let id = custom_id(GuildId::new(123), 4);
        assert_eq!(id, "roleSelection-123-4");
        assert_eq!(parse_custom_id(&id), Some((GuildId::new(123), 4)));
    }

    #[test]
    fn foreign_custom_ids_are_rejected() {
        assert_eq!(parse_custom_id("otherBot-123-0"), None);
        assert_eq!(parse_custom_id("roleSelectionX-123-0"), None);
        assert_eq!(parse_custom_id("roleSelection-abc-0"), None);
        assert_eq!(parse_custom_id("roleSelection-123"), None);
    }

    #[test]
    fn resolve_drops_deleted_and_garbage_ids() {
        let ids = vec!["1".to_string(), "2".to_string(), "nope".to_string(), "3".to_string()];
        let resolved = resolve_roles(&ids, |id| (id.get() != 2).then(|| format!("role-{}", id)));
        assert_eq!(resolved.roles, vec![role(1), role(3)]);
        assert_eq!(resolved.stale, vec!["2".to_string(), "nope".to_string()]);
    }

    #[test]
    fn pages_hold_at_most_25_and_preserve_order() {
        for n in [1, 24, 25, 26, 50, 51, 130] {
            let list = roles(n);
            let pages = paginate(&list, &HashSet::new());

            assert_eq!(pages.len(), (n as usize).div_ceil(MAX_OPTIONS_PER_PAGE));
            assert!(pages.iter().all(|p| p.options.len() <= MAX_OPTIONS_PER_PAGE));
            assert!(pages.iter().all(|p| p.total == pages.len()));

            let flattened: Vec<ManagedRole> = pages
                .iter()
                .flat_map(|p| p.options.iter().map(|o| o.role.clone()))
                .collect();
            assert_eq!(flattened, list);
        }
    }

    #[test]
    fn exactly_25_roles_is_one_page_of_one() {
        let pages = paginate(&roles(25), &HashSet::new());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].placeholder(), "Select a role (Page 1 of 1)");
    }

    #[test]
    fn empty_list_has_no_pages() {
        assert!(paginate(&[], &HashSet::new()).is_empty());
    }

    #[test]
    fn held_roles_are_preselected() {
        let pages = paginate(&roles(3), &held(&[2]));
        let selected: Vec<bool> = pages[0].options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, true, false]);
    }

    #[test]
    fn switching_roles_revokes_then_grants() {
        let list = vec![role(1), role(2)];
        let plan = plan_selection(&list, &list, &held(&[1]), &chosen(2));
        assert_eq!(plan, vec![RoleChange::Revoke(role(1)), RoleChange::Grant(role(2))]);
    }

    #[test]
    fn choosing_earlier_role_sweeps_later_one() {
        let list = vec![role(1), role(2)];
        let plan = plan_selection(&list, &list, &held(&[2]), &chosen(1));
        assert_eq!(plan, vec![RoleChange::Grant(role(1)), RoleChange::Revoke(role(2))]);
    }

    #[test]
    fn unchanged_selection_is_a_no_op() {
        let list = vec![role(1), role(2)];
        assert!(plan_selection(&list, &list, &held(&[1]), &chosen(1)).is_empty());
        assert!(plan_selection(&list, &list, &held(&[]), &[]).is_empty());
    }

    #[test]
    fn keeping_a_held_role_still_drops_extras() {
        let list = vec![role(1), role(2), role(3)];
        let plan = plan_selection(&list[..1], &list, &held(&[1, 3]), &chosen(1));
        assert_eq!(plan, vec![RoleChange::Revoke(role(3))]);
    }

    #[test]
    fn clearing_the_menu_revokes_held_role() {
        let list = vec![role(1), role(2)];
        let plan = plan_selection(&list, &list, &held(&[2]), &[]);
        assert_eq!(plan, vec![RoleChange::Revoke(role(2))]);
    }

    #[test]
    fn grant_sweeps_roles_on_other_pages() {
        let managed = roles(30);
        let page_two = managed[25..].to_vec();
        let plan = plan_selection(&page_two, &managed, &held(&[3, 99]), &chosen(27));

        assert_eq!(plan, vec![RoleChange::Grant(role(27)), RoleChange::Revoke(role(3))]);
    }

    #[test]
    fn at_most_one_managed_role_after_any_selection() {
        let managed = roles(30);
        let pages = paginate(&managed, &HashSet::new());

        for start in [&[][..], &[1][..], &[1, 28][..], &[5, 26, 30][..]] {
            for page in &pages {
                let options: Vec<ManagedRole> = page.options.iter().map(|o| o.role.clone()).collect();
                for pick in options.iter().map(|r| vec![r.id.to_string()]).chain([vec![]]) {
                    let mut state = held(start);
                    for change in plan_selection(&options, &managed, &state, &pick) {
                        match change {
                            RoleChange::Grant(r) => assert!(state.insert(r.id)),
                            RoleChange::Revoke(r) => assert!(state.remove(&r.id)),
                        }
                    }
                    if !pick.is_empty() {
                        assert!(state.len() <= 1, "start {:?} pick {:?} left {:?}", start, pick, state);
                    }
                }
            }
        }
    }

    #[test]
    fn summary_lists_removed_then_added() {
        let mut summary = SelectionSummary::default();
        summary.record(&RoleChange::Revoke(ManagedRole::new(RoleId::new(1), "A")));
        summary.record(&RoleChange::Grant(ManagedRole::new(RoleId::new(2), "B")));

        assert_eq!(
            summary.message(),
            "**Removed the following roles:**\n    • A\n\n**Added the following roles:**\n    • B\n"
        );
    }

    #[test]
    fn empty_summary_reports_no_changes() {
        assert_eq!(SelectionSummary::default().message(), "No role changes have been made.");
    }
}
