//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `aula-store-sqlite`). Higher
//! layers (`aula-api`) depend on this abstraction, not on any concrete
//! backend.
//!
//! The contract is uniform across the five record types:
//!
//! - `create_*`: fails with [`Error::Conflict`] if the key (or a unique
//!   combination) already exists, [`Error::InvalidInput`] if a
//!   referenced row is missing or a grade is out of range; otherwise
//!   inserts with `version = 1` and returns the stored row.
//! - `get_*`: absence is a valid outcome, not an error.
//! - `update_*`: fails with [`Error::NotFound`] if the key is absent;
//!   otherwise replaces all mutable fields and sets
//!   `version = version + 1` atomically. Enrollment updates recompute
//!   the `sup` flag.
//! - `delete_*`: fails with [`Error::NotFound`] if absent, or
//!   [`Error::Conflict`] if the row is still referenced by a child
//!   (restrict-delete policy).
//! - `list_*`: all rows; join-expanded detail rows for teacher-cycles
//!   and enrollments.

use std::future::Future;

use crate::{
  Error,
  entity::{
    Enrollment, EnrollmentDetail, NewEnrollment, NewStudent, NewSubject,
    NewTeacher, NewTeacherCycle, Student, Subject, Teacher, TeacherCycle,
    TeacherCycleDetail,
  },
};

/// Abstraction over an Aula record store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  // ── Subjects ──────────────────────────────────────────────────────────

  fn create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Error>> + Send + '_;

  fn get_subject<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Subject>, Error>> + Send + 'a;

  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Error>> + Send + '_;

  fn update_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Error>> + Send + '_;

  fn delete_subject<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Error>> + Send + 'a;

  // ── Students ──────────────────────────────────────────────────────────

  fn create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Error>> + Send + '_;

  fn get_student<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<Option<Student>, Error>> + Send + 'a;

  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Error>> + Send + '_;

  fn update_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Error>> + Send + '_;

  fn delete_student<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<(), Error>> + Send + 'a;

  // ── Teachers ──────────────────────────────────────────────────────────

  fn create_teacher(
    &self,
    input: NewTeacher,
  ) -> impl Future<Output = Result<Teacher, Error>> + Send + '_;

  fn get_teacher<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<Option<Teacher>, Error>> + Send + 'a;

  fn list_teachers(
    &self,
  ) -> impl Future<Output = Result<Vec<Teacher>, Error>> + Send + '_;

  fn update_teacher(
    &self,
    input: NewTeacher,
  ) -> impl Future<Output = Result<Teacher, Error>> + Send + '_;

  fn delete_teacher<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<(), Error>> + Send + 'a;

  // ── Teacher-cycle assignments ─────────────────────────────────────────

  fn create_teacher_cycle(
    &self,
    input: NewTeacherCycle,
  ) -> impl Future<Output = Result<TeacherCycle, Error>> + Send + '_;

  fn get_teacher_cycle<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<TeacherCycle>, Error>> + Send + 'a;

  /// Join-expanded: teacher and subject names instead of raw keys.
  fn list_teacher_cycles(
    &self,
  ) -> impl Future<Output = Result<Vec<TeacherCycleDetail>, Error>> + Send + '_;

  fn update_teacher_cycle(
    &self,
    input: NewTeacherCycle,
  ) -> impl Future<Output = Result<TeacherCycle, Error>> + Send + '_;

  fn delete_teacher_cycle<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Error>> + Send + 'a;

  // ── Enrollments ───────────────────────────────────────────────────────

  fn create_enrollment(
    &self,
    input: NewEnrollment,
  ) -> impl Future<Output = Result<Enrollment, Error>> + Send + '_;

  fn get_enrollment<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Enrollment>, Error>> + Send + 'a;

  /// Join-expanded: student, teacher, cycle and subject names.
  fn list_enrollments(
    &self,
  ) -> impl Future<Output = Result<Vec<EnrollmentDetail>, Error>> + Send + '_;

  fn update_enrollment(
    &self,
    input: NewEnrollment,
  ) -> impl Future<Output = Result<Enrollment, Error>> + Send + '_;

  fn delete_enrollment<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Error>> + Send + 'a;
}
