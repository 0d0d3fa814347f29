#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use sleeplog::db::db::Db;
    use sleeplog::db::nights::Nights;
    use sleeplog::db::schema::{init_schema, NIGHTS_TABLE};
    use sleeplog::libs::night::SleepNight;
    use test_context::{test_context, TestContext};

    struct SchemaTestContext {
        conn: Connection,
    }

    impl TestContext for SchemaTestContext {
        fn setup() -> Self {
            SchemaTestContext {
                conn: Connection::open_in_memory().unwrap(),
            }
        }
    }

    fn columns(conn: &Connection) -> Vec<String> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", NIGHTS_TABLE)).unwrap();
        stmt.query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_creates_nights_table(ctx: &mut SchemaTestContext) {
        assert!(columns(&ctx.conn).is_empty());
        init_schema(&ctx.conn).unwrap();
        assert_eq!(columns(&ctx.conn), vec!["id", "start_time_milli", "end_time_milli", "quality_rating"]);
    }

    #[test_context(SchemaTestContext)]
    #[test]
    fn test_init_is_idempotent(ctx: &mut SchemaTestContext) {
        init_schema(&ctx.conn).unwrap();
        ctx.conn
            .execute(
                "INSERT INTO daily_sleep_quality_table (start_time_milli, end_time_milli) VALUES (1, 2)",
                [],
            )
            .unwrap();

        init_schema(&ctx.conn).unwrap();
        let count: i64 = ctx
            .conn
            .query_row("SELECT COUNT(*) FROM daily_sleep_quality_table", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        // Unrated by default.
        let quality: i32 = ctx
            .conn
            .query_row("SELECT quality_rating FROM daily_sleep_quality_table", [], |row| row.get(0))
            .unwrap();
        assert_eq!(quality, -1);
    }

    #[test]
    fn test_reopening_a_file_keeps_its_nights() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sleeplog.db");

        Nights::from_db(Db::open(&path).unwrap())
            .unwrap()
            .insert(&SleepNight::new(5))
            .unwrap();

        let reopened = Db::open(&path).unwrap();
        assert_eq!(columns(&reopened.conn).len(), 4);
        assert_eq!(Nights::from_db(reopened).unwrap().list_all().unwrap().len(), 1);
    }
}
