//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;

use crate::domain::animal::{Animal, AnimalDraft, AnimalId};
use crate::domain::consult::{Consult, ConsultDraft, ConsultId};
use crate::domain::ports::FixtureSequenceStore;
use crate::domain::sequence::{SequenceAllocator, SequenceValue};
use crate::domain::staff::{PasswordDigest, Staff, StaffDraft, StaffId};
use crate::domain::tutor::{Tutor, TutorDraft, TutorId};

/// Allocator over empty collections: hands out 1, 2, 3, ... per kind.
pub(crate) fn empty_allocator() -> Arc<SequenceAllocator> {
    Arc::new(SequenceAllocator::new(
        Arc::new(FixtureSequenceStore),
        Arc::new(DefaultClock),
    ))
}

pub(crate) fn tutor_draft() -> TutorDraft {
    TutorDraft::new("Maria Souza", None, None, "11988887777", None).expect("valid draft")
}

pub(crate) fn tutor_from(draft: &TutorDraft, sequence: &SequenceValue) -> Tutor {
    let now = Utc::now();
    Tutor {
        id: TutorId::random(),
        sequence: Some(sequence.clone()),
        name: draft.name.clone(),
        cpf: draft.cpf.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        address: draft.address.clone(),
        deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn stored_tutor() -> Tutor {
    let sequence = SequenceValue::new("1").expect("valid sequence");
    tutor_from(&tutor_draft(), &sequence)
}

pub(crate) fn animal_draft() -> AnimalDraft {
    AnimalDraft::new("Rex", "canine", None, "male", "3 years", None).expect("valid draft")
}

pub(crate) fn animal_from(
    tutor_id: &TutorId,
    draft: &AnimalDraft,
    sequence: &SequenceValue,
) -> Animal {
    let now = Utc::now();
    Animal {
        id: AnimalId::random(),
        sequence: Some(sequence.clone()),
        name: draft.name.clone(),
        species: draft.species.clone(),
        race: draft.race.clone(),
        gender: draft.gender.clone(),
        age: draft.age.clone(),
        coat: draft.coat.clone(),
        tutor_id: *tutor_id,
        deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn consult_draft() -> ConsultDraft {
    ConsultDraft::new("Rex", "canine", "11988887777", None, "15/09/2026").expect("valid draft")
}

pub(crate) fn consult_from(
    tutor_id: &TutorId,
    draft: &ConsultDraft,
    sequence: &SequenceValue,
) -> Consult {
    let now = Utc::now();
    Consult {
        id: ConsultId::random(),
        sequence: Some(sequence.clone()),
        animal_name: draft.animal_name.clone(),
        species: draft.species.clone(),
        phone: draft.phone.clone(),
        description: draft.description.clone(),
        date: draft.date,
        done: false,
        tutor_id: *tutor_id,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn staff_from(draft: &StaffDraft) -> Staff {
    let now = Utc::now();
    Staff {
        id: StaffId::random(),
        role: draft.role,
        name: draft.name.clone(),
        cpf: draft.cpf.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        registration: draft.registration.clone(),
        password: draft.password.clone(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn stored_staff(password: &str) -> Staff {
    let now = Utc::now();
    Staff {
        id: StaffId::random(),
        role: crate::domain::staff::StaffRole::Secretary,
        name: "Fernanda Lima".to_owned(),
        cpf: "99296018056".to_owned(),
        email: Some("fernanda@example.com".to_owned()),
        phone: Some("123456789".to_owned()),
        registration: None,
        password: PasswordDigest::derive(password),
        created_at: now,
        updated_at: now,
    }
}
