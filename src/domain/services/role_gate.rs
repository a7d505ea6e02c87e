use crate::domain::models::booking::{Booking, Category};
use crate::domain::models::role::{Role, RoleContext};

/// Whether `role` may create a booking in `category`.
///
/// Administrative roles may create anything; the committee role only its own
/// category; residents a self-service whitelist; guests only the most
/// restrictive self-service category.
pub fn can_create(role: Role, category: Category) -> bool {
    match role {
        Role::Admin | Role::SubAdmin => true,
        Role::Committee => category == Category::CommitteeEvent,
        Role::Resident => matches!(category, Category::SmallGroup | Category::LargeGroup),
        Role::Guest => category == Category::SmallGroup,
    }
}

/// Whether the caller may edit or remove `booking`: administrative roles,
/// the committee role within its category, or the recorded owner.
pub fn can_edit(ctx: &RoleContext, booking: &Booking) -> bool {
    if ctx.role.is_administrative() {
        return true;
    }
    if ctx.role == Role::Committee && booking.category == Category::CommitteeEvent {
        return true;
    }
    match (&booking.owner_id, &ctx.id) {
        (Some(owner), Some(id)) => owner == id,
        _ => false,
    }
}
