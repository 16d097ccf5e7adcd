//! SQL schema for the Aula SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated
//! on the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys are always on: referential fields must point at an
/// existing row at write time, and deleting a still-referenced parent
/// fails (restrict-delete). Uniqueness invariants live in the schema so
/// a racing duplicate write degrades to a deterministic constraint
/// error instead of a lost check-then-act.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS subjects (
    id      TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS students (
    cedula  TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS teachers (
    cedula  TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1
);

-- One teacher teaching one subject during one academic cycle.
CREATE TABLE IF NOT EXISTS teacher_cycles (
    id             TEXT PRIMARY KEY,
    teacher_cedula TEXT NOT NULL REFERENCES teachers(cedula),
    subject_id     TEXT NOT NULL REFERENCES subjects(id),
    cycle          TEXT NOT NULL,
    version        INTEGER NOT NULL DEFAULT 1,
    UNIQUE (teacher_cedula, subject_id, cycle)
);

-- `sup` is derived from the grades on every write; 0 = approved,
-- 1 = supplementary exam required.
CREATE TABLE IF NOT EXISTS enrollments (
    id               TEXT PRIMARY KEY,
    student_cedula   TEXT NOT NULL REFERENCES students(cedula),
    teacher_cycle_id TEXT NOT NULL REFERENCES teacher_cycles(id),
    grade1           REAL NOT NULL DEFAULT 0,
    grade2           REAL NOT NULL DEFAULT 0,
    sup              INTEGER NOT NULL DEFAULT 0,
    version          INTEGER NOT NULL DEFAULT 1,
    UNIQUE (student_cedula, teacher_cycle_id)
);

PRAGMA user_version = 1;
";
