#[cfg(test)]
mod tests {
    use crate::error::{DriverError, QueryError};
    use crate::flavor::Flavor;
    use crate::modifiers::{Arg, Ident, alias, list, raw};
    use crate::quoter::Quoter;
    use crate::test_driver::RecordingDriver;
    use crate::value::SqlValue;
    use crate::{Connection, row};
    use pretty_assertions::assert_eq;

    fn mysql() -> Quoter {
        Connection::offline(Flavor::MySQL).quoter()
    }

    #[test]
    fn identifier_doubles_embedded_backticks() {
        let q = mysql();
        assert_eq!(q.quote_identifier("id"), "`id`");
        assert_eq!(q.quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(q.quote_identifier("  padded "), "`padded`");
        assert_eq!(q.quote_identifier("*"), "*");
        assert_eq!(q.quote_identifier(""), "``");
    }

    #[test]
    fn identifier_cannot_break_out() {
        let q = mysql();
        let quoted = q.quote_identifier("x` OR 1=1 -- ");
        assert_eq!(quoted, "`x`` OR 1=1 --`");
        let inner = &quoted[1..quoted.len() - 1];
        assert!(!inner.replace("``", "").contains('`'));
    }

    #[test]
    fn postgres_identifier_uses_double_quotes() {
        let q = Connection::offline(Flavor::PostgreSQL).quoter();
        assert_eq!(q.quote_identifier("na\"me"), "\"na\"\"me\"");
        assert_eq!(q.quote_name(&"public.users".into()), "\"public\".\"users\"");
    }

    #[test]
    fn qualified_names_split_on_dots() {
        let q = mysql();
        assert_eq!(q.quote_name(&"a.b.c".into()), "`a`.`b`.`c`");
        assert_eq!(q.quote_name(&"users.*".into()), "`users`.*");
    }

    #[test]
    fn aliases_and_raw_identifiers() {
        let q = mysql();
        assert_eq!(q.quote_name(&alias("u", "users")), "`users` AS `u`");
        assert_eq!(
            q.quote_name(&Ident::from("db.users").as_("u")),
            "`db`.`users` AS `u`"
        );
        assert_eq!(
            q.quote_name(&Ident::from(raw("COUNT(*)")).as_("total")),
            "COUNT(*) AS `total`"
        );
        assert_eq!(q.quote_name(&raw("NOW()").into()), "NOW()");
    }

    #[test]
    fn null_never_reaches_driver() {
        let (driver, conn) = RecordingDriver::default().connect();
        let q = conn.quoter();
        assert_eq!(q.quote_value(&SqlValue::Null).unwrap(), "NULL");
        assert!(driver.escaped.borrow().is_empty());

        assert_eq!(q.quote_value(&SqlValue::from("x")).unwrap(), "'x'");
        assert_eq!(driver.escaped.borrow().len(), 1);
    }

    #[test]
    fn raw_args_are_verbatim() {
        let q = mysql();
        assert_eq!(q.quote_arg(&raw("`a` + 1").into()).unwrap(), "`a` + 1");
        assert_eq!(q.quote_arg(&Arg::from(5)).unwrap(), "'5'");
    }

    #[test]
    fn nested_list_is_rejected() {
        let q = mysql();
        assert!(matches!(
            q.quote_arg(&list([1, 2])),
            Err(QueryError::Shape(_))
        ));
    }

    #[test]
    fn driver_refusal_propagates() {
        let q = mysql();
        assert_eq!(
            q.quote_value(&SqlValue::F64(f64::NAN)),
            Err(QueryError::Driver(DriverError::Unquotable(
                "non-finite float NaN".into()
            )))
        );
    }

    #[test]
    fn by_fields_keep_direction_suffix() {
        let q = mysql();
        let fields: Vec<Ident> = vec![
            "users.id DESC".into(),
            "name".into(),
            "created_at  asc".into(),
            raw("FIELD(id, 3, 1)").into(),
        ];
        assert_eq!(
            q.quote_by_fields(&fields),
            vec![
                "`users`.`id` DESC",
                "`name`",
                "`created_at` asc",
                "FIELD(id, 3, 1)"
            ]
        );
    }

    #[test]
    fn set_values_and_bulk_values() {
        let q = mysql();
        let r = row! { "name" => "a'b", "age" => 3, "at" => raw("NOW()"), "gone" => () };
        assert_eq!(
            q.quote_set_values(&r).unwrap(),
            "`name`='a\\'b', `age`='3', `at`=NOW(), `gone`=NULL"
        );
        assert_eq!(q.quote_fields(&r), "`name`, `age`, `at`, `gone`");
        assert_eq!(
            q.quote_bulk_values(&r).unwrap(),
            "'a\\'b','3',NOW(),NULL"
        );
    }
}
