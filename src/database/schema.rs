//! DDL de las tablas `users`, `addresses` y `phones`
//!
//! Se aplica al arrancar con `IF NOT EXISTS`; no es un sistema de migraciones.

pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id     BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        name        TEXT NOT NULL,
        sur_name    TEXT NOT NULL,
        birth_date  DATE NOT NULL,
        cpf         TEXT NOT NULL CONSTRAINT users_cpf_key UNIQUE,
        email       TEXT NOT NULL
    )
    "#,
    // 123.456.789-10 y 12345678910 son el mismo CPF
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS users_cpf_digits_key
        ON users ((regexp_replace(cpf, '[^0-9]', '', 'g')))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS addresses (
        address_id      BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        public_place    TEXT NOT NULL,
        street_address  TEXT NOT NULL,
        complement      TEXT,
        city            TEXT NOT NULL,
        state           TEXT NOT NULL,
        zip_code        TEXT NOT NULL,
        user_id         BIGINT NOT NULL
            CONSTRAINT addresses_user_id_key UNIQUE
            CONSTRAINT addresses_user_id_fkey REFERENCES users (user_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS phones (
        phone_id    BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        phone_type  TEXT NOT NULL,
        number      TEXT NOT NULL,
        user_id     BIGINT NOT NULL
            CONSTRAINT phones_user_id_fkey REFERENCES users (user_id) ON DELETE CASCADE
    )
    "#,
    // (21) 96687-8776 y 21966878776 son el mismo número
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS phones_user_id_number_digits_key
        ON phones (user_id, (regexp_replace(number, '[^0-9]', '', 'g')))
    "#,
    "CREATE INDEX IF NOT EXISTS phones_user_id_idx ON phones (user_id)",
];
