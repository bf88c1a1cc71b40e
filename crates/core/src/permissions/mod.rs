//! Permission system for booking operations

use crate::models::UserRole;

/// Actions that can be performed in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    // Room inventory management
    CreateRoom,
    EditRoom,
    DeleteRoom,

    // Bookings
    CreateBooking,
    CreateRecurringBooking,
    DeleteOwnBooking,
    DeleteAnyBooking,

    // Reporting
    ViewAnalytics,
    ExportBookings,
}

/// Permission matrix for application roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: UserRole, action: BookingAction) -> bool {
        match action {
            // Room inventory - admin only
            BookingAction::CreateRoom => role == UserRole::Admin,
            BookingAction::EditRoom => role == UserRole::Admin,
            BookingAction::DeleteRoom => role == UserRole::Admin,

            // Any member books rooms and manages their own bookings
            BookingAction::CreateBooking => role >= UserRole::Member,
            BookingAction::CreateRecurringBooking => role >= UserRole::Member,
            BookingAction::DeleteOwnBooking => role >= UserRole::Member,

            // Only admins remove other users' bookings
            BookingAction::DeleteAnyBooking => role == UserRole::Admin,

            // Reporting is open to everyone
            BookingAction::ViewAnalytics => role >= UserRole::Member,
            BookingAction::ExportBookings => role >= UserRole::Member,
        }
    }

    /// Check if a role may delete a booking, given ownership
    pub fn can_delete_booking(role: UserRole, is_owner: bool) -> bool {
        if is_owner {
            Self::can_perform(role, BookingAction::DeleteOwnBooking)
        } else {
            Self::can_perform(role, BookingAction::DeleteAnyBooking)
        }
    }
}
