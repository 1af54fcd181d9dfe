//! 测试用驱动：按 MySQL 规则转义字面量，并记录所有执行过的 SQL。

use crate::connection::Connection;
use crate::driver::{Driver, LiteralDriver, Record};
use crate::error::DriverError;
use crate::flavor::Flavor;
use crate::value::SqlValue;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub(crate) struct RecordingDriver {
    pub executed: RefCell<Vec<String>>,
    pub escaped: RefCell<Vec<SqlValue>>,
    pub rows: Vec<Record>,
    pub insert_id: Option<String>,
    pub fail_with: Option<String>,
}

impl RecordingDriver {
    pub fn connect(self) -> (Rc<Self>, Connection) {
        let driver = Rc::new(self);
        let conn = Connection::from_rc(driver.clone()).with_flavor(Flavor::MySQL);
        (driver, conn)
    }

    fn record(&self, sql: &str) -> Result<(), DriverError> {
        self.executed.borrow_mut().push(sql.to_string());
        match &self.fail_with {
            Some(msg) => Err(DriverError::Statement(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Driver for RecordingDriver {
    fn escape_literal(&self, value: &SqlValue) -> Result<String, DriverError> {
        self.escaped.borrow_mut().push(value.clone());
        LiteralDriver::new(Flavor::MySQL).escape_literal(value)
    }

    fn execute(&self, sql: &str) -> Result<u64, DriverError> {
        self.record(sql)?;
        Ok(1)
    }

    fn query(&self, sql: &str) -> Result<Vec<Record>, DriverError> {
        self.record(sql)?;
        Ok(self.rows.clone())
    }

    fn last_insert_id(&self) -> Result<Option<String>, DriverError> {
        Ok(self.insert_id.clone())
    }
}
