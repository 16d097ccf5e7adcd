//! Integration tests for `SqliteStore` against an in-memory database.

use aula_core::{
  Error,
  entity::{NewEnrollment, NewStudent, NewSubject, NewTeacher, NewTeacherCycle},
  store::RecordStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn subject(id: &str, name: &str) -> NewSubject {
  NewSubject { id: id.into(), name: name.into() }
}

fn student(cedula: &str, name: &str) -> NewStudent {
  NewStudent { cedula: cedula.into(), name: name.into() }
}

fn teacher(cedula: &str, name: &str) -> NewTeacher {
  NewTeacher { cedula: cedula.into(), name: name.into() }
}

fn assignment(id: &str, teacher: &str, subject: &str, cycle: &str) -> NewTeacherCycle {
  NewTeacherCycle {
    id:             id.into(),
    teacher_cedula: teacher.into(),
    subject_id:     subject.into(),
    cycle:          cycle.into(),
  }
}

fn enrollment(id: &str, student: &str, assignment: &str, g1: f64, g2: f64) -> NewEnrollment {
  NewEnrollment {
    id:               id.into(),
    student_cedula:   student.into(),
    teacher_cycle_id: assignment.into(),
    grade1:           g1,
    grade2:           g2,
  }
}

/// Store pre-loaded with one teacher, subject, student and assignment.
async fn seeded() -> SqliteStore {
  let s = store().await;
  s.create_teacher(teacher("1700000001", "Ada Lovelace")).await.unwrap();
  s.create_subject(subject("MAT101", "Math")).await.unwrap();
  s.create_student(student("1700000002", "Alan Turing")).await.unwrap();
  s.create_teacher_cycle(assignment("pc1", "1700000001", "MAT101", "2024-A"))
    .await
    .unwrap();
  s
}

// ─── Subjects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_subject_starts_at_version_one() {
  let s = store().await;
  let created = s.create_subject(subject("MAT101", "Math")).await.unwrap();
  assert_eq!(created.id, "MAT101");
  assert_eq!(created.name, "Math");
  assert_eq!(created.version, 1);

  let fetched = s.get_subject("MAT101").await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_subject_missing_returns_none() {
  let s = store().await;
  assert!(s.get_subject("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_subject_conflicts_and_leaves_row_untouched() {
  let s = store().await;
  s.create_subject(subject("MAT101", "Math")).await.unwrap();

  let err = s
    .create_subject(subject("MAT101", "Mathematics"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  let row = s.get_subject("MAT101").await.unwrap().unwrap();
  assert_eq!(row.name, "Math");
  assert_eq!(row.version, 1);
}

#[tokio::test]
async fn update_subject_increments_version() {
  let s = store().await;
  s.create_subject(subject("MAT101", "Math")).await.unwrap();

  let updated = s
    .update_subject(subject("MAT101", "Mathematics"))
    .await
    .unwrap();
  assert_eq!(updated.name, "Mathematics");
  assert_eq!(updated.version, 2);

  let again = s
    .update_subject(subject("MAT101", "Applied Mathematics"))
    .await
    .unwrap();
  assert_eq!(again.version, 3);
}

#[tokio::test]
async fn update_missing_subject_is_not_found() {
  let s = store().await;
  let err = s.update_subject(subject("NOPE", "x")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn delete_subject_then_get_returns_none() {
  let s = store().await;
  s.create_subject(subject("MAT101", "Math")).await.unwrap();
  s.delete_subject("MAT101").await.unwrap();
  assert!(s.get_subject("MAT101").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_subject_is_not_found() {
  let s = store().await;
  let err = s.delete_subject("NOPE").await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn list_subjects_returns_all() {
  let s = store().await;
  s.create_subject(subject("MAT101", "Math")).await.unwrap();
  s.create_subject(subject("FIS201", "Physics")).await.unwrap();
  let all = s.list_subjects().await.unwrap();
  assert_eq!(all.len(), 2);
}

// ─── Students and teachers ───────────────────────────────────────────────────

#[tokio::test]
async fn student_crud_roundtrip() {
  let s = store().await;
  let created = s
    .create_student(student("1700000002", "Alan Turing"))
    .await
    .unwrap();
  assert_eq!(created.version, 1);

  let updated = s
    .update_student(student("1700000002", "A. M. Turing"))
    .await
    .unwrap();
  assert_eq!(updated.version, 2);
  assert_eq!(updated.name, "A. M. Turing");

  s.delete_student("1700000002").await.unwrap();
  assert!(s.get_student("1700000002").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_teacher_cedula_conflicts() {
  let s = store().await;
  s.create_teacher(teacher("1700000001", "Ada")).await.unwrap();
  let err = s
    .create_teacher(teacher("1700000001", "Someone Else"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

// ─── Teacher-cycle assignments ───────────────────────────────────────────────

#[tokio::test]
async fn assignment_with_unknown_references_is_invalid() {
  let s = store().await;
  let err = s
    .create_teacher_cycle(assignment("pc1", "9999", "NOPE", "2024-A"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn duplicate_assignment_triple_conflicts() {
  let s = seeded().await;
  // Same (teacher, subject, cycle) under a different id.
  let err = s
    .create_teacher_cycle(assignment("pc2", "1700000001", "MAT101", "2024-A"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  // A different cycle is fine.
  let ok = s
    .create_teacher_cycle(assignment("pc2", "1700000001", "MAT101", "2024-B"))
    .await
    .unwrap();
  assert_eq!(ok.version, 1);
}

#[tokio::test]
async fn update_assignment_replaces_fields_and_bumps_version() {
  let s = seeded().await;
  s.create_subject(subject("FIS201", "Physics")).await.unwrap();

  let updated = s
    .update_teacher_cycle(assignment("pc1", "1700000001", "FIS201", "2024-B"))
    .await
    .unwrap();
  assert_eq!(updated.subject_id, "FIS201");
  assert_eq!(updated.cycle, "2024-B");
  assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn update_assignment_to_existing_triple_conflicts() {
  let s = seeded().await;
  s.create_teacher_cycle(assignment("pc2", "1700000001", "MAT101", "2024-B"))
    .await
    .unwrap();

  let err = s
    .update_teacher_cycle(assignment("pc2", "1700000001", "MAT101", "2024-A"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn list_assignments_joins_names() {
  let s = seeded().await;
  let rows = s.list_teacher_cycles().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].id, "pc1");
  assert_eq!(rows[0].teacher, "Ada Lovelace");
  assert_eq!(rows[0].subject, "Math");
  assert_eq!(rows[0].cycle, "2024-A");
  assert_eq!(rows[0].version, 1);
}

#[tokio::test]
async fn delete_referenced_teacher_conflicts() {
  let s = seeded().await;
  let err = s.delete_teacher("1700000001").await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  // Remove the assignment first; then the teacher can go.
  s.delete_teacher_cycle("pc1").await.unwrap();
  s.delete_teacher("1700000001").await.unwrap();
}

// ─── Enrollments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn enrollment_derives_sup_on_create() {
  let s = seeded().await;
  // Average 7.0 is exactly the threshold: approved.
  let e = s
    .create_enrollment(enrollment("m1", "1700000002", "pc1", 6.0, 8.0))
    .await
    .unwrap();
  assert_eq!(e.sup, 0);
  assert_eq!(e.version, 1);
}

#[tokio::test]
async fn enrollment_recomputes_sup_on_update() {
  let s = seeded().await;
  s.create_enrollment(enrollment("m1", "1700000002", "pc1", 9.0, 9.0))
    .await
    .unwrap();

  let updated = s
    .update_enrollment(enrollment("m1", "1700000002", "pc1", 5.0, 6.0))
    .await
    .unwrap();
  assert_eq!(updated.sup, 1);
  assert_eq!(updated.version, 2);

  let fetched = s.get_enrollment("m1").await.unwrap().unwrap();
  assert_eq!(fetched.sup, 1);
  assert_eq!(fetched.grade1, 5.0);
  assert_eq!(fetched.grade2, 6.0);
}

#[tokio::test]
async fn enrollment_rejects_out_of_range_grades() {
  let s = seeded().await;
  let err = s
    .create_enrollment(enrollment("m1", "1700000002", "pc1", 10.5, 5.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));

  s.create_enrollment(enrollment("m1", "1700000002", "pc1", 10.0, 5.0))
    .await
    .unwrap();
  let err = s
    .update_enrollment(enrollment("m1", "1700000002", "pc1", -1.0, 5.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn duplicate_enrollment_pair_conflicts() {
  let s = seeded().await;
  s.create_enrollment(enrollment("m1", "1700000002", "pc1", 8.0, 8.0))
    .await
    .unwrap();

  let err = s
    .create_enrollment(enrollment("m2", "1700000002", "pc1", 7.0, 7.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn enrollment_with_unknown_references_is_invalid() {
  let s = seeded().await;
  let err = s
    .create_enrollment(enrollment("m1", "0000000000", "pc1", 8.0, 8.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn delete_referenced_assignment_conflicts() {
  let s = seeded().await;
  s.create_enrollment(enrollment("m1", "1700000002", "pc1", 8.0, 8.0))
    .await
    .unwrap();

  let err = s.delete_teacher_cycle("pc1").await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn list_enrollments_joins_names() {
  let s = seeded().await;
  s.create_enrollment(enrollment("m1", "1700000002", "pc1", 6.0, 8.0))
    .await
    .unwrap();

  let rows = s.list_enrollments().await.unwrap();
  assert_eq!(rows.len(), 1);
  let row = &rows[0];
  assert_eq!(row.id, "m1");
  assert_eq!(row.student, "Alan Turing");
  assert_eq!(row.teacher, "Ada Lovelace");
  assert_eq!(row.cycle, "2024-A");
  assert_eq!(row.subject, "Math");
  assert_eq!(row.grade1, 6.0);
  assert_eq!(row.grade2, 8.0);
  assert_eq!(row.sup, 0);
  assert_eq!(row.version, 1);
}
