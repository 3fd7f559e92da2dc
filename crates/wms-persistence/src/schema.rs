// Esquema Diesel del almacén de procesos (SQLite).
diesel::table! {
    process_store (key) {
        key -> Text,
        value -> Text,
        updated_at -> BigInt,
    }
}
