mod file_record_repository_tests {
    use crate::model::repository::{ItemStatus, Rgb};
    use crate::repository::{file_record_repository, open_connection};
    use crate::test::*;

    #[test]
    fn created_records_round_trip_including_colors() {
        refresh_db();
        let record = test_record("0001", "photo");
        let con = open_connection();
        let id = file_record_repository::create_file_record(&record, &con).unwrap();
        let retrieved = file_record_repository::get_file_record(id, &con).unwrap();
        con.close().unwrap();
        assert_eq!(Some(id), retrieved.id);
        assert_eq!(record.item_id, retrieved.item_id);
        assert_eq!(record.filepath, retrieved.filepath);
        assert_eq!(record.year_color, retrieved.year_color);
        assert_eq!(record.month_color, retrieved.month_color);
        assert_eq!(record.day_color, retrieved.day_color);
        assert_eq!(ItemStatus::Draft, retrieved.status);
        cleanup();
    }

    #[test]
    fn insert_many_reports_one_outcome_per_record_in_order() {
        refresh_db();
        let records = vec![test_record("0001", "first"), test_record("0001", "second")];
        let con = open_connection();
        let outcomes = file_record_repository::insert_many(&records, &con);
        assert_eq!(2, outcomes.len());
        let ids: Vec<u32> = outcomes.into_iter().map(|outcome| outcome.unwrap()).collect();
        assert!(ids[1] > ids[0]);
        let stored = file_record_repository::get_by_item_id("0001", &con).unwrap();
        con.close().unwrap();
        assert_eq!(2, stored.len());
        cleanup();
    }

    #[test]
    fn batch_lookup_is_ordered_by_filename() {
        refresh_db();
        create_record_db_entry("0001", "zebra");
        create_record_db_entry("0001", "apple");
        create_record_db_entry("0002", "other");
        let con = open_connection();
        let records = file_record_repository::get_by_item_id("0001", &con).unwrap();
        con.close().unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(vec!["apple", "zebra"], names);
        cleanup();
    }

    #[test]
    fn listing_can_be_narrowed_to_one_status() {
        refresh_db();
        let draft = create_record_db_entry("0001", "a");
        let failed = create_record_db_entry("0002", "b");
        let con = open_connection();
        let now = chrono::offset::Local::now().naive_local();
        file_record_repository::update_status(failed, ItemStatus::Failed, now, &con).unwrap();
        let failed_records =
            file_record_repository::get_all_records(Some(ItemStatus::Failed), &con).unwrap();
        let draft_records =
            file_record_repository::get_all_records(Some(ItemStatus::Draft), &con).unwrap();
        con.close().unwrap();
        assert_eq!(vec![Some(failed)], failed_records.iter().map(|r| r.id).collect::<Vec<_>>());
        assert_eq!(vec![Some(draft)], draft_records.iter().map(|r| r.id).collect::<Vec<_>>());
        cleanup();
    }

    #[test]
    fn live_item_ids_exclude_deleted_batches() {
        refresh_db();
        create_record_db_entry("0001", "a");
        let deleted = create_record_db_entry("0002", "b");
        let con = open_connection();
        let now = chrono::offset::Local::now().naive_local();
        assert!(file_record_repository::soft_delete_record(deleted, now, &con).unwrap());
        let ids = file_record_repository::get_live_item_ids(&con).unwrap();
        con.close().unwrap();
        assert_eq!(vec![String::from("0001")], ids);
        cleanup();
    }

    #[test]
    fn updating_a_missing_record_reports_no_rows() {
        refresh_db();
        let con = open_connection();
        let now = chrono::offset::Local::now().naive_local();
        assert!(!file_record_repository::update_status(1, ItemStatus::Failed, now, &con).unwrap());
        assert!(!file_record_repository::soft_delete_record(1, now, &con).unwrap());
        con.close().unwrap();
        cleanup();
    }

    #[test]
    fn metadata_update_leaves_passed_none_fields_untouched() {
        refresh_db();
        let id = create_record_db_entry("0001", "a");
        let con = open_connection();
        let now = chrono::offset::Local::now().naive_local();
        file_record_repository::update_metadata(
            id,
            Some("Sunset"),
            None,
            Some("sky, sea"),
            Some(6),
            Some(2),
            now,
            &con,
        )
        .unwrap();
        file_record_repository::update_metadata(id, None, Some("Later"), None, None, None, now, &con)
            .unwrap();
        let record = file_record_repository::get_file_record(id, &con).unwrap();
        con.close().unwrap();
        assert_eq!(Some(String::from("Sunset")), record.title);
        assert_eq!(Some(String::from("Later")), record.description);
        assert_eq!(Some(String::from("sky, sea")), record.tags);
        assert_eq!(Some(6), record.title_length);
        assert_eq!(Some(2), record.tags_count);
        cleanup();
    }

    #[test]
    fn a_mangled_stored_color_falls_back_instead_of_failing() {
        refresh_db();
        let id = create_record_db_entry("0001", "a");
        let con = open_connection();
        con.execute(
            "update project_files set year_color = 'not-a-color' where id = ?1",
            [id],
        )
        .unwrap();
        let record = file_record_repository::get_file_record(id, &con).unwrap();
        con.close().unwrap();
        assert_eq!(file_record_repository::FALLBACK_YEAR_COLOR, record.year_color);
        cleanup();
    }

    #[test]
    fn recolor_only_touches_other_years() {
        refresh_db();
        let old = create_record_db_entry("0001", "a");
        let mut current = test_record("0002", "b");
        current.year = String::from("2030");
        let con = open_connection();
        let current_id = file_record_repository::create_file_record(&current, &con).unwrap();
        let now = chrono::offset::Local::now().naive_local();
        let changed =
            file_record_repository::recolor_stale_years("2030", &Rgb::STALE_YEAR, now, &con)
                .unwrap();
        assert_eq!(1, changed);
        let old_record = file_record_repository::get_file_record(old, &con).unwrap();
        let current_record = file_record_repository::get_file_record(current_id, &con).unwrap();
        con.close().unwrap();
        assert_eq!(Rgb::STALE_YEAR, old_record.year_color);
        assert_ne!(Rgb::STALE_YEAR, current_record.year_color);
        cleanup();
    }
}

mod metadata_repository_tests {
    use crate::repository::{metadata_repository, open_connection};
    use crate::test::*;

    #[test]
    fn the_schema_version_is_recorded_on_init() {
        refresh_db();
        let con = open_connection();
        assert_eq!("1", metadata_repository::get_version(&con).unwrap());
        con.close().unwrap();
        cleanup();
    }

    #[test]
    fn values_can_be_set_and_overwritten() {
        refresh_db();
        let con = open_connection();
        metadata_repository::set_value("marker", "first", &con).unwrap();
        assert_eq!("first", metadata_repository::get_value("marker", &con).unwrap());
        metadata_repository::set_value("marker", "second", &con).unwrap();
        assert_eq!("second", metadata_repository::get_value("marker", &con).unwrap());
        con.close().unwrap();
        cleanup();
    }

    #[test]
    fn missing_values_are_an_error() {
        refresh_db();
        let con = open_connection();
        assert!(metadata_repository::get_value("missing", &con).is_err());
        con.close().unwrap();
        cleanup();
    }
}
