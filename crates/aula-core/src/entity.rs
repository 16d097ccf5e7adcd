//! The five record types, their input forms, and the join-expanded read
//! models returned by list endpoints.
//!
//! Every stored row carries a `version` counter: 1 on creation,
//! incremented by exactly 1 on every successful update, never reset.
//! Keys (`id` / `cedula`) are always caller-supplied; the store never
//! generates them.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Grade rules ─────────────────────────────────────────────────────────────

/// Inclusive grade range accepted by the store.
pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 10.0;

/// A grade average at or above this passes; below it requires a
/// supplementary exam.
pub const PASS_THRESHOLD: f64 = 7.0;

/// Derive the supplementary-exam flag from the two partial grades.
///
/// `0` = approved, `1` = supplementary exam required. An average of
/// exactly [`PASS_THRESHOLD`] is approved.
pub fn sup_flag(grade1: f64, grade2: f64) -> i64 {
  if (grade1 + grade2) / 2.0 >= PASS_THRESHOLD {
    0
  } else {
    1
  }
}

/// Reject grades outside `[GRADE_MIN, GRADE_MAX]` or non-finite values.
pub fn validate_grade(field: &str, value: f64) -> Result<()> {
  if !value.is_finite() || !(GRADE_MIN..=GRADE_MAX).contains(&value) {
    return Err(Error::InvalidInput(format!(
      "{field} must be between {GRADE_MIN} and {GRADE_MAX}, got {value}"
    )));
  }
  Ok(())
}

// ─── Subject ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub id:      String,
  pub name:    String,
  pub version: i64,
}

/// Input for subject create and update (full-field replacement; the
/// store owns `version`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
  pub id:   String,
  pub name: String,
}

// ─── Student ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub cedula:  String,
  pub name:    String,
  pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
  pub cedula: String,
  pub name:   String,
}

// ─── Teacher ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
  pub cedula:  String,
  pub name:    String,
  pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeacher {
  pub cedula: String,
  pub name:   String,
}

// ─── Teacher-cycle assignment ────────────────────────────────────────────────

/// A teacher assigned to a subject for one academic cycle.
///
/// The `(teacher_cedula, subject_id, cycle)` triple is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherCycle {
  pub id:             String,
  pub teacher_cedula: String,
  pub subject_id:     String,
  pub cycle:          String,
  pub version:        i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeacherCycle {
  pub id:             String,
  pub teacher_cedula: String,
  pub subject_id:     String,
  pub cycle:          String,
}

/// Join-expanded row returned by the teacher-cycle list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherCycleDetail {
  pub id:      String,
  pub teacher: String,
  pub subject: String,
  pub cycle:   String,
  pub version: i64,
}

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// A student enrolled in a teacher-cycle assignment, with two partial
/// grades and the derived supplementary-exam flag.
///
/// The `(student_cedula, teacher_cycle_id)` pair is unique. `sup` is
/// recomputed from the grades on every create and update; it is never
/// settable by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
  pub id:               String,
  pub student_cedula:   String,
  pub teacher_cycle_id: String,
  pub grade1:           f64,
  pub grade2:           f64,
  pub sup:              i64,
  pub version:          i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnrollment {
  pub id:               String,
  pub student_cedula:   String,
  pub teacher_cycle_id: String,
  pub grade1:           f64,
  pub grade2:           f64,
}

impl NewEnrollment {
  /// Server-side range check on both grades.
  pub fn validate(&self) -> Result<()> {
    validate_grade("grade1", self.grade1)?;
    validate_grade("grade2", self.grade2)?;
    Ok(())
  }
}

/// Join-expanded row returned by the enrollment list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDetail {
  pub id:      String,
  pub student: String,
  pub teacher: String,
  pub cycle:   String,
  pub subject: String,
  pub grade1:  f64,
  pub grade2:  f64,
  pub sup:     i64,
  pub version: i64,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sup_flag_above_threshold_is_approved() {
    assert_eq!(sup_flag(8.0, 9.0), 0);
  }

  #[test]
  fn sup_flag_below_threshold_requires_supplementary() {
    assert_eq!(sup_flag(5.0, 6.0), 1);
  }

  #[test]
  fn sup_flag_exactly_at_threshold_is_approved() {
    // Average exactly 7.0 passes.
    assert_eq!(sup_flag(6.0, 8.0), 0);
    assert_eq!(sup_flag(7.0, 7.0), 0);
  }

  #[test]
  fn sup_flag_just_below_threshold() {
    assert_eq!(sup_flag(6.9, 7.0), 1);
  }

  #[test]
  fn grades_outside_range_are_rejected() {
    assert!(validate_grade("grade1", -0.1).is_err());
    assert!(validate_grade("grade1", 10.1).is_err());
    assert!(validate_grade("grade1", f64::NAN).is_err());
    assert!(validate_grade("grade1", 0.0).is_ok());
    assert!(validate_grade("grade1", 10.0).is_ok());
  }

  #[test]
  fn enrollment_validate_checks_both_grades() {
    let mut input = NewEnrollment {
      id:               "m1".into(),
      student_cedula:   "0102030405".into(),
      teacher_cycle_id: "pc1".into(),
      grade1:           7.0,
      grade2:           11.0,
    };
    assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));
    input.grade2 = 10.0;
    assert!(input.validate().is_ok());
  }
}
