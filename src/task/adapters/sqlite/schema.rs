//! Diesel schema for task persistence.

diesel::table! {
    /// Task records keyed by identifier.
    tasks (task_id) {
        /// Opaque task identifier.
        task_id -> Text,
        /// Task title as given at creation.
        title -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Creation timestamp in the canonical `YYYY-MM-DDTHH:MM:SSZ` form.
        created_at -> Text,
        /// Status label (`Open`, `In Progress` or `Closed`).
        status -> Text,
    }
}
