wire_enum! {
    /// Which portal a signed-in account belongs to.
    Role, "role" {
        Student => "student",
        Organizer => "organizer",
        Sponsor => "sponsor",
    }
}

wire_enum! {
    #[derive(PartialOrd, Ord)]
    ProficiencyLevel, "proficiency level" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        Expert => "expert",
    }
}

wire_enum! {
    SkillCategory, "skill category" {
        Frontend => "frontend",
        Backend => "backend",
        Design => "design",
        DataScience => "data_science",
        Mobile => "mobile",
        Devops => "devops",
        ProductManagement => "product_management",
        Other => "other",
    }
}
