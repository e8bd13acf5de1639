wire_enum! {
    TeamStatus, "team status" {
        Forming => "forming",
        Complete => "complete",
        Disbanded => "disbanded",
    }
}

wire_enum! {
    InvitationStatus, "invitation status" {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
        Expired => "expired",
    }
}

impl InvitationStatus {
    // Only a pending invitation can still be answered.
    pub fn is_final(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

wire_enum! {
    MemberRole, "member role" {
        Captain => "captain",
        Member => "member",
    }
}
