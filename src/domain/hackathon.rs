wire_enum! {
    /// Lifecycle of a hackathon as set by its organizer.
    HackathonStatus, "hackathon status" {
        Draft => "draft",
        RegistrationOpen => "registration_open",
        RegistrationClosed => "registration_closed",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl HackathonStatus {
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, HackathonStatus::RegistrationOpen)
    }

    /// No further transitions happen once a hackathon is completed or cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HackathonStatus::Completed | HackathonStatus::Cancelled)
    }
}

wire_enum! {
    /// Standing of a student within a single hackathon.
    ParticipantStatus, "participant status" {
        Registered => "registered",
        InTeam => "in_team",
        Withdrawn => "withdrawn",
    }
}
