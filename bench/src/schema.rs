//! Server-side routines the cases call.
//!
//! The suite does not own the database, so nothing here runs implicitly;
//! `pl-bench install` provisions a fresh database. PL/Perl needs the
//! `plperl` extension, which usually takes a superuser to create.

use crate::error::{BenchError, Result};
use crate::harness::with_session;
use crate::session::{Batch, Connector, Session};
use log::info;

/// Name of every routine created by [`install`].
pub const ROUTINES: [&str; 11] = [
    "plpgsql_empty_loop_n",
    "plpgsql_loop_n_select",
    "plpgsql_loop_n_select_increment",
    "plpgsql_loop_n_assign_increment",
    "perl_loop_n_increment",
    "plpgsql_add",
    "sql_add",
    "perl_add",
    "plpgsql_loop_call_plpgsql_add",
    "plpgsql_loop_call_sql_add",
    "plpgsql_loop_call_perl_add",
];

/// DDL in dependency order: the add functions come before the loops that
/// call them.
pub const INSTALL_STATEMENTS: [&str; 12] = [
    "create extension if not exists plperl",
    r#"create or replace function plpgsql_empty_loop_n(n int) returns void
language plpgsql as $$
begin
  for i in 1..n loop
  end loop;
end;
$$"#,
    r#"create or replace function plpgsql_loop_n_select(n int) returns int
language plpgsql as $$
declare
  x int;
begin
  for i in 1..n loop
    select 1 into x;
  end loop;
  return x;
end;
$$"#,
    r#"create or replace function plpgsql_loop_n_select_increment(n int) returns int
language plpgsql as $$
declare
  c int := 0;
begin
  for i in 1..n loop
    select c + 1 into c;
  end loop;
  return c;
end;
$$"#,
    r#"create or replace function plpgsql_loop_n_assign_increment(n int) returns int
language plpgsql as $$
declare
  c int := 0;
begin
  for i in 1..n loop
    c := c + 1;
  end loop;
  return c;
end;
$$"#,
    r#"create or replace function perl_loop_n_increment(int) returns int
language plperl as $$
  my ($n) = @_;
  my $c = 0;
  for (my $i = 0; $i < $n; $i++) {
    $c++;
  }
  return $c;
$$"#,
    r#"create or replace function plpgsql_add(a int, b int) returns int
language plpgsql as $$
begin
  return a + b;
end;
$$"#,
    r#"create or replace function sql_add(a int, b int) returns int
language sql as $$
  select a + b
$$"#,
    r#"create or replace function perl_add(int, int) returns int
language plperl as $$
  return $_[0] + $_[1];
$$"#,
    r#"create or replace function plpgsql_loop_call_plpgsql_add(n int) returns int
language plpgsql as $$
declare
  c int := 0;
begin
  for i in 1..n loop
    c := plpgsql_add(c, 1);
  end loop;
  return c;
end;
$$"#,
    r#"create or replace function plpgsql_loop_call_sql_add(n int) returns int
language plpgsql as $$
declare
  c int := 0;
begin
  for i in 1..n loop
    c := sql_add(c, 1);
  end loop;
  return c;
end;
$$"#,
    r#"create or replace function plpgsql_loop_call_perl_add(n int) returns int
language plpgsql as $$
declare
  c int := 0;
begin
  for i in 1..n loop
    c := perl_add(c, 1);
  end loop;
  return c;
end;
$$"#,
];

pub fn install_batch() -> Batch {
    INSTALL_STATEMENTS.iter().collect()
}

/// Create or replace every routine in one round trip. Safe to repeat.
pub fn install<C: Connector>(connector: &C) -> Result<()> {
    let batch = install_batch();
    with_session(connector, |session| {
        session
            .send_batch(&batch)
            .map_err(|err| BenchError::query(0, err))
    })?;
    info!("installed {} routines", ROUTINES.len());
    Ok(())
}
