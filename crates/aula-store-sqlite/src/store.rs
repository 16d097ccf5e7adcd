//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].
//!
//! Writes are single-statement on purpose: inserts rely on the schema's
//! PK/UNIQUE/FK constraints, and updates bump `version` inside the
//! `UPDATE` itself, so two racing requests against the same key resolve
//! to a deterministic `Conflict`/`NotFound` instead of a lost update.

use std::path::Path;

use rusqlite::{OptionalExtension as _, ffi};

use aula_core::{
  Error, Result,
  entity::{
    Enrollment, EnrollmentDetail, NewEnrollment, NewStudent, NewSubject,
    NewTeacher, NewTeacherCycle, Student, Subject, Teacher, TeacherCycle,
    TeacherCycleDetail, sup_flag,
  },
  store::RecordStore,
};

use crate::schema::SCHEMA;

// ─── Error mapping ───────────────────────────────────────────────────────────

fn storage(e: impl std::fmt::Display) -> Error {
  Error::Storage(e.to_string())
}

/// Extended SQLite result code, if the error is a constraint violation.
fn constraint_code(e: &tokio_rusqlite::Error) -> Option<i32> {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    err, _,
  )) = e
  {
    Some(err.extended_code)
  } else {
    None
  }
}

/// Classify a failed INSERT or UPDATE.
fn map_write_err(
  e: tokio_rusqlite::Error,
  duplicate: &str,
  unique: &str,
  reference: &str,
) -> Error {
  match constraint_code(&e) {
    Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
      Error::Conflict(duplicate.to_owned())
    }
    Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => Error::Conflict(unique.to_owned()),
    Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
      Error::InvalidInput(reference.to_owned())
    }
    _ => storage(e),
  }
}

/// Classify a failed DELETE. A foreign-key violation here means a child
/// row still references the target (restrict-delete).
fn map_delete_err(e: tokio_rusqlite::Error, referenced: &str) -> Error {
  match constraint_code(&e) {
    Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
      Error::Conflict(referenced.to_owned())
    }
    _ => storage(e),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Aula record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(storage)
  }

  // ── Shared plumbing for the three (key, name, version) tables ─────────

  async fn insert_named(
    &self,
    entity: &'static str,
    table: &'static str,
    key_col: &'static str,
    key: String,
    name: String,
  ) -> Result<()> {
    let duplicate = format!("{entity} {key} already exists");
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} ({key_col}, name, version) VALUES (?1, ?2, 1)"
          ),
          rusqlite::params![key, name],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| map_write_err(e, &duplicate, &duplicate, &duplicate))
  }

  async fn get_named(
    &self,
    table: &'static str,
    key_col: &'static str,
    key: String,
  ) -> Result<Option<(String, String, i64)>> {
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {key_col}, name, version FROM {table} \
                 WHERE {key_col} = ?1"
              ),
              rusqlite::params![key],
              |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)
  }

  async fn list_named(
    &self,
    table: &'static str,
    key_col: &'static str,
  ) -> Result<Vec<(String, String, i64)>> {
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {key_col}, name, version FROM {table} ORDER BY {key_col}"
        ))?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(storage)
  }

  /// Full-field replacement with an atomic version bump. Returns the
  /// new version, or `None` if the key is absent.
  async fn update_named(
    &self,
    table: &'static str,
    key_col: &'static str,
    key: String,
    name: String,
  ) -> Result<Option<i64>> {
    self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          &format!(
            "UPDATE {table} SET name = ?2, version = version + 1 \
             WHERE {key_col} = ?1"
          ),
          rusqlite::params![key, name],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        let version = conn.query_row(
          &format!("SELECT version FROM {table} WHERE {key_col} = ?1"),
          rusqlite::params![key],
          |row| row.get(0),
        )?;
        Ok(Some(version))
      })
      .await
      .map_err(storage)
  }

  async fn delete_row(
    &self,
    entity: &'static str,
    table: &'static str,
    key_col: &'static str,
    key: &str,
  ) -> Result<()> {
    let owned_key = key.to_owned();
    let referenced = format!("{entity} {key} is still referenced");
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE {key_col} = ?1"),
          rusqlite::params![owned_key],
        )?)
      })
      .await
      .map_err(|e| map_delete_err(e, &referenced))?;

    if affected == 0 {
      return Err(Error::NotFound(format!("{entity} {key}")));
    }
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  // ── Subjects ──────────────────────────────────────────────────────────

  async fn create_subject(&self, input: NewSubject) -> Result<Subject> {
    self
      .insert_named(
        "subject",
        "subjects",
        "id",
        input.id.clone(),
        input.name.clone(),
      )
      .await?;
    Ok(Subject { id: input.id, name: input.name, version: 1 })
  }

  async fn get_subject<'a>(&'a self, id: &'a str) -> Result<Option<Subject>> {
    Ok(
      self
        .get_named("subjects", "id", id.to_owned())
        .await?
        .map(|(id, name, version)| Subject { id, name, version }),
    )
  }

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    Ok(
      self
        .list_named("subjects", "id")
        .await?
        .into_iter()
        .map(|(id, name, version)| Subject { id, name, version })
        .collect(),
    )
  }

  async fn update_subject(&self, input: NewSubject) -> Result<Subject> {
    let version = self
      .update_named("subjects", "id", input.id.clone(), input.name.clone())
      .await?
      .ok_or_else(|| Error::NotFound(format!("subject {}", input.id)))?;
    Ok(Subject { id: input.id, name: input.name, version })
  }

  async fn delete_subject<'a>(&'a self, id: &'a str) -> Result<()> {
    self.delete_row("subject", "subjects", "id", id).await
  }

  // ── Students ──────────────────────────────────────────────────────────

  async fn create_student(&self, input: NewStudent) -> Result<Student> {
    self
      .insert_named(
        "student",
        "students",
        "cedula",
        input.cedula.clone(),
        input.name.clone(),
      )
      .await?;
    Ok(Student { cedula: input.cedula, name: input.name, version: 1 })
  }

  async fn get_student<'a>(
    &'a self,
    cedula: &'a str,
  ) -> Result<Option<Student>> {
    Ok(
      self
        .get_named("students", "cedula", cedula.to_owned())
        .await?
        .map(|(cedula, name, version)| Student { cedula, name, version }),
    )
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    Ok(
      self
        .list_named("students", "cedula")
        .await?
        .into_iter()
        .map(|(cedula, name, version)| Student { cedula, name, version })
        .collect(),
    )
  }

  async fn update_student(&self, input: NewStudent) -> Result<Student> {
    let version = self
      .update_named(
        "students",
        "cedula",
        input.cedula.clone(),
        input.name.clone(),
      )
      .await?
      .ok_or_else(|| Error::NotFound(format!("student {}", input.cedula)))?;
    Ok(Student { cedula: input.cedula, name: input.name, version })
  }

  async fn delete_student<'a>(&'a self, cedula: &'a str) -> Result<()> {
    self
      .delete_row("student", "students", "cedula", cedula)
      .await
  }

  // ── Teachers ──────────────────────────────────────────────────────────

  async fn create_teacher(&self, input: NewTeacher) -> Result<Teacher> {
    self
      .insert_named(
        "teacher",
        "teachers",
        "cedula",
        input.cedula.clone(),
        input.name.clone(),
      )
      .await?;
    Ok(Teacher { cedula: input.cedula, name: input.name, version: 1 })
  }

  async fn get_teacher<'a>(
    &'a self,
    cedula: &'a str,
  ) -> Result<Option<Teacher>> {
    Ok(
      self
        .get_named("teachers", "cedula", cedula.to_owned())
        .await?
        .map(|(cedula, name, version)| Teacher { cedula, name, version }),
    )
  }

  async fn list_teachers(&self) -> Result<Vec<Teacher>> {
    Ok(
      self
        .list_named("teachers", "cedula")
        .await?
        .into_iter()
        .map(|(cedula, name, version)| Teacher { cedula, name, version })
        .collect(),
    )
  }

  async fn update_teacher(&self, input: NewTeacher) -> Result<Teacher> {
    let version = self
      .update_named(
        "teachers",
        "cedula",
        input.cedula.clone(),
        input.name.clone(),
      )
      .await?
      .ok_or_else(|| Error::NotFound(format!("teacher {}", input.cedula)))?;
    Ok(Teacher { cedula: input.cedula, name: input.name, version })
  }

  async fn delete_teacher<'a>(&'a self, cedula: &'a str) -> Result<()> {
    self
      .delete_row("teacher", "teachers", "cedula", cedula)
      .await
  }

  // ── Teacher-cycle assignments ─────────────────────────────────────────

  async fn create_teacher_cycle(
    &self,
    input: NewTeacherCycle,
  ) -> Result<TeacherCycle> {
    let duplicate = format!("teacher assignment {} already exists", input.id);
    let unique = format!(
      "teacher {} is already assigned to subject {} in cycle {}",
      input.teacher_cedula, input.subject_id, input.cycle
    );
    let reference =
      "teacher assignment references an unknown teacher or subject".to_owned();

    let row = input.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teacher_cycles
             (id, teacher_cedula, subject_id, cycle, version)
           VALUES (?1, ?2, ?3, ?4, 1)",
          rusqlite::params![row.id, row.teacher_cedula, row.subject_id, row.cycle],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| map_write_err(e, &duplicate, &unique, &reference))?;

    Ok(TeacherCycle {
      id:             input.id,
      teacher_cedula: input.teacher_cedula,
      subject_id:     input.subject_id,
      cycle:          input.cycle,
      version:        1,
    })
  }

  async fn get_teacher_cycle<'a>(
    &'a self,
    id: &'a str,
  ) -> Result<Option<TeacherCycle>> {
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, teacher_cedula, subject_id, cycle, version
               FROM teacher_cycles WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(TeacherCycle {
                  id:             row.get(0)?,
                  teacher_cedula: row.get(1)?,
                  subject_id:     row.get(2)?,
                  cycle:          row.get(3)?,
                  version:        row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)
  }

  async fn list_teacher_cycles(&self) -> Result<Vec<TeacherCycleDetail>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT pc.id, t.name, s.name, pc.cycle, pc.version
           FROM teacher_cycles pc
           JOIN teachers t ON t.cedula = pc.teacher_cedula
           JOIN subjects s ON s.id     = pc.subject_id
           ORDER BY pc.id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(TeacherCycleDetail {
              id:      row.get(0)?,
              teacher: row.get(1)?,
              subject: row.get(2)?,
              cycle:   row.get(3)?,
              version: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(storage)
  }

  async fn update_teacher_cycle(
    &self,
    input: NewTeacherCycle,
  ) -> Result<TeacherCycle> {
    let unique = format!(
      "teacher {} is already assigned to subject {} in cycle {}",
      input.teacher_cedula, input.subject_id, input.cycle
    );
    let reference =
      "teacher assignment references an unknown teacher or subject".to_owned();

    let row = input.clone();
    let version = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE teacher_cycles
           SET teacher_cedula = ?2, subject_id = ?3, cycle = ?4,
               version = version + 1
           WHERE id = ?1",
          rusqlite::params![row.id, row.teacher_cedula, row.subject_id, row.cycle],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        let version = conn.query_row(
          "SELECT version FROM teacher_cycles WHERE id = ?1",
          rusqlite::params![row.id],
          |r| r.get(0),
        )?;
        Ok(Some(version))
      })
      .await
      .map_err(|e| map_write_err(e, &unique, &unique, &reference))?
      .ok_or_else(|| {
        Error::NotFound(format!("teacher assignment {}", input.id))
      })?;

    Ok(TeacherCycle {
      id:             input.id,
      teacher_cedula: input.teacher_cedula,
      subject_id:     input.subject_id,
      cycle:          input.cycle,
      version,
    })
  }

  async fn delete_teacher_cycle<'a>(&'a self, id: &'a str) -> Result<()> {
    self
      .delete_row("teacher assignment", "teacher_cycles", "id", id)
      .await
  }

  // ── Enrollments ───────────────────────────────────────────────────────

  async fn create_enrollment(
    &self,
    input: NewEnrollment,
  ) -> Result<Enrollment> {
    input.validate()?;
    let sup = sup_flag(input.grade1, input.grade2);

    let duplicate = format!("enrollment {} already exists", input.id);
    let unique = format!(
      "student {} is already enrolled in assignment {}",
      input.student_cedula, input.teacher_cycle_id
    );
    let reference =
      "enrollment references an unknown student or assignment".to_owned();

    let row = input.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO enrollments
             (id, student_cedula, teacher_cycle_id, grade1, grade2, sup, version)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
          rusqlite::params![
            row.id,
            row.student_cedula,
            row.teacher_cycle_id,
            row.grade1,
            row.grade2,
            sup,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| map_write_err(e, &duplicate, &unique, &reference))?;

    Ok(Enrollment {
      id:               input.id,
      student_cedula:   input.student_cedula,
      teacher_cycle_id: input.teacher_cycle_id,
      grade1:           input.grade1,
      grade2:           input.grade2,
      sup,
      version:          1,
    })
  }

  async fn get_enrollment<'a>(
    &'a self,
    id: &'a str,
  ) -> Result<Option<Enrollment>> {
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, student_cedula, teacher_cycle_id,
                      grade1, grade2, sup, version
               FROM enrollments WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(Enrollment {
                  id:               row.get(0)?,
                  student_cedula:   row.get(1)?,
                  teacher_cycle_id: row.get(2)?,
                  grade1:           row.get(3)?,
                  grade2:           row.get(4)?,
                  sup:              row.get(5)?,
                  version:          row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)
  }

  async fn list_enrollments(&self) -> Result<Vec<EnrollmentDetail>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT e.id, st.name, t.name, pc.cycle, s.name,
                  e.grade1, e.grade2, e.sup, e.version
           FROM enrollments e
           JOIN students st       ON st.cedula = e.student_cedula
           JOIN teacher_cycles pc ON pc.id     = e.teacher_cycle_id
           JOIN teachers t        ON t.cedula  = pc.teacher_cedula
           JOIN subjects s        ON s.id      = pc.subject_id
           ORDER BY e.id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(EnrollmentDetail {
              id:      row.get(0)?,
              student: row.get(1)?,
              teacher: row.get(2)?,
              cycle:   row.get(3)?,
              subject: row.get(4)?,
              grade1:  row.get(5)?,
              grade2:  row.get(6)?,
              sup:     row.get(7)?,
              version: row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(storage)
  }

  async fn update_enrollment(
    &self,
    input: NewEnrollment,
  ) -> Result<Enrollment> {
    input.validate()?;
    let sup = sup_flag(input.grade1, input.grade2);

    let unique = format!(
      "student {} is already enrolled in assignment {}",
      input.student_cedula, input.teacher_cycle_id
    );
    let reference =
      "enrollment references an unknown student or assignment".to_owned();

    let row = input.clone();
    let version = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE enrollments
           SET student_cedula = ?2, teacher_cycle_id = ?3,
               grade1 = ?4, grade2 = ?5, sup = ?6,
               version = version + 1
           WHERE id = ?1",
          rusqlite::params![
            row.id,
            row.student_cedula,
            row.teacher_cycle_id,
            row.grade1,
            row.grade2,
            sup,
          ],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        let version = conn.query_row(
          "SELECT version FROM enrollments WHERE id = ?1",
          rusqlite::params![row.id],
          |r| r.get(0),
        )?;
        Ok(Some(version))
      })
      .await
      .map_err(|e| map_write_err(e, &unique, &unique, &reference))?
      .ok_or_else(|| Error::NotFound(format!("enrollment {}", input.id)))?;

    Ok(Enrollment {
      id:               input.id,
      student_cedula:   input.student_cedula,
      teacher_cycle_id: input.teacher_cycle_id,
      grade1:           input.grade1,
      grade2:           input.grade2,
      sup,
      version,
    })
  }

  async fn delete_enrollment<'a>(&'a self, id: &'a str) -> Result<()> {
    self.delete_row("enrollment", "enrollments", "id", id).await
  }
}
