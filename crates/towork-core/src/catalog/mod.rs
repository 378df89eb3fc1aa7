//! Admin-managed catalog: mission domains and skills.

mod competence;
mod domaine;

pub use competence::{Certification, Competence, CompetenceDraft, CompetenceLevel};
pub use domaine::{Domaine, DomaineDraft};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domaine_draft_limits() {
        assert!(DomaineDraft::new("Design").validate().is_ok());
        assert!(DomaineDraft::new("").validate().is_err());
        assert!(DomaineDraft::new("x".repeat(61)).validate().is_err());
    }

    #[test]
    fn competence_requires_domain() {
        let draft = CompetenceDraft {
            name: "Rust".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
        let draft = CompetenceDraft {
            domaine_id: Some(2),
            years_of_experience: Some(5),
            ..draft
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn sparse_domaine_deserializes() {
        let domaine: Domaine = serde_json::from_str(r#"{"id": 1, "name": "Data"}"#).unwrap();
        assert!(domaine.skills.is_empty());
        assert_eq!(domaine.status_label(), "Inactif");
    }
}
