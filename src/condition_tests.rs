#[cfg(test)]
mod tests {
    use crate::Connection;
    use crate::condition::{ConditionEntry, ConditionGroup, Connector, Operator, render};
    use crate::error::QueryError;
    use crate::flavor::Flavor;
    use crate::modifiers::{Arg, list, raw};
    use crate::test_driver::RecordingDriver;
    use pretty_assertions::assert_eq;

    fn group() -> ConditionGroup {
        ConditionGroup::new(Connection::offline(Flavor::MySQL).quoter())
    }

    fn where_sql(g: &ConditionGroup) -> String {
        g.render("WHERE").unwrap().join(" ")
    }

    #[test]
    fn operator_parse_is_case_and_space_insensitive() {
        assert_eq!(Operator::parse("not  in").unwrap(), Operator::NotIn);
        assert_eq!(Operator::parse(" LIKE ").unwrap(), Operator::Like);
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::LessGreater);
        assert_eq!(Operator::NotBetween.to_string(), "NOT BETWEEN");
        assert_eq!(
            Operator::parse("~~"),
            Err(QueryError::Shape("unknown operator `~~`".into()))
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert!(group().render("WHERE").unwrap().is_empty());
    }

    #[test]
    fn first_entry_takes_keyword() {
        let mut g = group();
        g.or_where("a", "=", 1).where_("b", ">", 2).or_where("c", "like", "x%");
        assert_eq!(
            where_sql(&g),
            "WHERE `a` = '1' AND `b` > '2' OR `c` LIKE 'x%'"
        );
    }

    #[test]
    fn null_equality_becomes_is_null() {
        let mut g = group();
        g.where_("deleted_at", "=", ())
            .where_("banned_at", "!=", None::<i64>)
            .where_("locked_at", "<>", ());
        assert_eq!(
            where_sql(&g),
            "WHERE `deleted_at` IS NULL AND `banned_at` IS NOT NULL AND `locked_at` IS NOT NULL"
        );
    }

    #[test]
    fn null_never_reaches_driver_in_conditions() {
        let (driver, conn) = RecordingDriver::default().connect();
        let mut g = ConditionGroup::new(conn.quoter());
        g.where_("a", "=", ()).where_("b", "<=>", ());
        assert_eq!(where_sql(&g), "WHERE `a` IS NULL AND `b` <=> NULL");
        assert!(driver.escaped.borrow().is_empty());
    }

    #[test]
    fn in_and_not_in_lists() {
        let mut g = group();
        g.where_("id", "in", list([1, 2, 3]))
            .where_("name", "NOT IN", list(["a", "b"]));
        assert_eq!(
            where_sql(&g),
            "WHERE `id` IN ('1', '2', '3') AND `name` NOT IN ('a', 'b')"
        );
    }

    #[test]
    fn in_with_raw_subquery() {
        let mut g = group();
        g.where_("id", "IN", raw("SELECT `uid` FROM `admins`"));
        assert_eq!(
            where_sql(&g),
            "WHERE `id` IN (SELECT `uid` FROM `admins`)"
        );
    }

    #[test]
    fn in_requires_values() {
        let mut g = group();
        g.where_("id", "IN", list(Vec::<i64>::new()));
        assert_eq!(
            g.render("WHERE"),
            Err(QueryError::Shape("IN requires at least one value".into()))
        );

        let mut g = group();
        g.where_("id", "IN", 5);
        assert!(matches!(g.render("WHERE"), Err(QueryError::Shape(_))));
    }

    #[test]
    fn between_renders_two_values() {
        let mut g = group();
        g.where_("age", "between", list([18, 30]))
            .or_where("score", "NOT BETWEEN", list([raw("`min`"), raw("`max`")]));
        assert_eq!(
            where_sql(&g),
            "WHERE `age` BETWEEN '18' AND '30' OR `score` NOT BETWEEN `min` AND `max`"
        );
    }

    #[test]
    fn between_arity_is_checked() {
        let mut g = group();
        g.where_("age", "BETWEEN", list([1, 2, 3]));
        assert_eq!(
            g.render("WHERE"),
            Err(QueryError::Shape("BETWEEN requires exactly two values".into()))
        );

        let mut g = group();
        g.where_("age", "BETWEEN", 1);
        assert!(g.render("WHERE").is_err());
    }

    #[test]
    fn function_operators_compare_against_call() {
        let mut g = group();
        g.where_("m", "greatest", list([1, 2]))
            .where_("n", "COALESCE", list([Arg::from(()), Arg::from("x")]));
        assert_eq!(
            where_sql(&g),
            "WHERE `m` = GREATEST ('1', '2') AND `n` = COALESCE (NULL, 'x')"
        );
    }

    #[test]
    fn list_for_scalar_operator_is_rejected() {
        let mut g = group();
        g.where_("a", "=", list([1, 2]));
        assert_eq!(
            g.render("WHERE"),
            Err(QueryError::Shape(
                "operator = does not accept a value list".into()
            ))
        );
    }

    #[test]
    fn unknown_operator_is_recorded() {
        let mut g = group();
        g.where_("a", "===", 1).where_("b", "=", 2);
        assert!(g.error().is_some());
        assert_eq!(
            g.render("WHERE"),
            Err(QueryError::Shape("unknown operator `===`".into()))
        );
    }

    #[test]
    fn raw_and_column_conditions() {
        let mut g = group();
        g.where_raw(raw("`a` > `b`"))
            .or_where_raw(raw("FIND_IN_SET('x', `tags`)"))
            .where_column("users.id", "=", "posts.user_id");
        assert_eq!(
            where_sql(&g),
            "WHERE `a` > `b` OR FIND_IN_SET('x', `tags`) AND `users`.`id` = `posts`.`user_id`"
        );
    }

    #[test]
    fn bare_raw_entry_after_first_has_no_connector() {
        let mut g = group();
        g.where_("a", "=", 1)
            .push(ConditionEntry::Raw(raw("AND `b` = 2")));
        assert_eq!(where_sql(&g), "WHERE `a` = '1' AND `b` = 2");

        let mut g = group();
        g.push(ConditionEntry::Raw(raw("1 = 1")));
        assert_eq!(where_sql(&g), "WHERE 1 = 1");
    }

    #[test]
    fn groups_are_parenthesized() {
        let mut g = group();
        g.where_("status", "=", "active").or_where_group(|q| {
            q.where_("role", "=", "admin").where_("age", ">", 18);
        });
        assert_eq!(
            where_sql(&g),
            "WHERE `status` = 'active' OR ( `role` = 'admin' AND `age` > '18' )"
        );
    }

    #[test]
    fn leading_group_takes_keyword() {
        let mut g = group();
        g.where_group(|q| {
            q.where_("a", "=", 1).or_where("b", "=", 2);
        })
        .where_("c", "=", 3);
        assert_eq!(
            where_sql(&g),
            "WHERE ( `a` = '1' OR `b` = '2' ) AND `c` = '3'"
        );
    }

    #[test]
    fn nested_groups_stay_balanced() {
        let mut g = group();
        g.where_group(|q| {
            q.where_("a", "=", 1).or_where_group(|q| {
                q.where_("b", "=", 2).where_group(|q| {
                    q.where_("c", "=", 3).or_where("d", "=", 4);
                });
            });
        });
        let sql = where_sql(&g);
        assert_eq!(
            sql,
            "WHERE ( `a` = '1' OR ( `b` = '2' AND ( `c` = '3' OR `d` = '4' ) ) )"
        );
        assert_eq!(sql.matches('(').count(), sql.matches(')').count());
    }

    #[test]
    fn empty_group_is_a_no_op() {
        let mut g = group();
        g.where_group(|_| {}).where_("a", "=", 1).or_where_group(|_| {});
        assert_eq!(g.entries().len(), 1);
        assert_eq!(where_sql(&g), "WHERE `a` = '1'");

        let mut g = group();
        g.where_group(|q| {
            q.where_group(|_| {});
        });
        assert!(g.is_empty());
        assert!(g.render("WHERE").unwrap().is_empty());
    }

    #[test]
    fn group_error_propagates_to_parent() {
        let mut g = group();
        g.where_group(|q| {
            q.where_("a", "nope", 1);
        });
        assert!(g.is_empty());
        assert_eq!(
            g.render("WHERE"),
            Err(QueryError::Shape("unknown operator `nope`".into()))
        );
    }

    #[test]
    fn fragments_never_start_with_connector() {
        let mut g = group();
        g.or_where_group(|q| {
            q.or_where("a", "=", 1).where_("b", "=", 2);
        })
        .or_where("c", "=", 3);
        let fragments = g.render("HAVING").unwrap();
        assert!(fragments[0].starts_with("HAVING "));
        assert_eq!(fragments[1], "`a` = '1'");
        let sql = fragments.join(" ");
        assert!(!sql.contains("( AND") && !sql.contains("( OR"));
    }

    #[test]
    fn render_without_keyword() {
        let q = Connection::offline(Flavor::MySQL).quoter();
        let entries = vec![
            ConditionEntry::Comparison {
                connector: Connector::Or,
                field: "x".into(),
                operator: Operator::GreaterEqual,
                value: 1.into(),
            },
            ConditionEntry::RawComparison {
                connector: Connector::Or,
                raw: raw("`y` IS NULL"),
            },
        ];
        assert_eq!(
            render(&entries, "", &q).unwrap(),
            vec!["`x` >= '1'", "OR `y` IS NULL"]
        );
    }
}
