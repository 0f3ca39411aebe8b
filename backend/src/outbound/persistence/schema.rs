//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations/`
//! exactly; Diesel uses them for compile-time query validation. Regenerate
//! with `diesel print-schema` after a migration changes the schema.

diesel::table! {
    /// Animal owners.
    ///
    /// `sequence` is the human-facing record number, unique when present;
    /// legacy rows imported without one hold NULL. `deleted` soft-deletes
    /// the row without freeing its sequence.
    tutors (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-facing record number, unique when present.
        sequence -> Nullable<Varchar>,
        /// Full name.
        name -> Varchar,
        /// Normalised 11-digit CPF; unique when present.
        cpf -> Nullable<Varchar>,
        /// Normalised email; unique when present.
        email -> Nullable<Varchar>,
        /// Contact phone, digits only.
        phone -> Varchar,
        /// Postal address free text.
        address -> Nullable<Varchar>,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Patients, each registered under one tutor.
    animals (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-facing record number, unique when present.
        sequence -> Nullable<Varchar>,
        /// Call name.
        name -> Varchar,
        /// Species.
        species -> Varchar,
        /// Breed, when known.
        race -> Nullable<Varchar>,
        /// Sex of the animal as recorded at intake.
        gender -> Varchar,
        /// Age free text.
        age -> Varchar,
        /// Coat description, when recorded.
        coat -> Nullable<Varchar>,
        /// Owning tutor (FK to tutors.id).
        tutor_id -> Uuid,
        /// Soft-delete flag.
        deleted -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Consultations booked for a tutor.
    consults (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-facing record number, unique when present.
        sequence -> Nullable<Varchar>,
        /// Animal name as given at booking time.
        animal_name -> Varchar,
        /// Species as given at booking time.
        species -> Varchar,
        /// Contact phone, digits only.
        phone -> Varchar,
        /// Free-text reason or notes.
        description -> Nullable<Varchar>,
        /// Scheduled visit date.
        date -> Date,
        /// Whether the consultation has been carried out.
        done -> Bool,
        /// Tutor the consult belongs to (FK to tutors.id).
        tutor_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Clinic staff accounts: secretaries, teachers, students.
    staff (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Role name: "secretary", "teacher", or "student".
        role -> Varchar,
        /// Full name.
        name -> Varchar,
        /// Normalised 11-digit CPF; unique.
        cpf -> Varchar,
        /// Normalised email; unique when present.
        email -> Nullable<Varchar>,
        /// Contact phone, when known.
        phone -> Nullable<Varchar>,
        /// Academic registration; unique when present.
        registration -> Nullable<Varchar>,
        /// Salted credential digest (`salt$digest` in hex).
        password_digest -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(animals -> tutors (tutor_id));
diesel::joinable!(consults -> tutors (tutor_id));

diesel::allow_tables_to_appear_in_same_query!(animals, consults, tutors);
