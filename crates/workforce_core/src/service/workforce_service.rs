//! Workforce use-case service.
//!
//! # Responsibility
//! - Expose every query module operation behind one shareable handle.
//! - Build a fresh query module, and so a fresh runner, per call.
//!
//! # Invariants
//! - The service holds no connection between calls.
//! - Calls from different threads never share a runner.

use crate::db::ConnectionProvider;
use crate::model::account::Account;
use crate::model::business::Business;
use crate::model::client::{Client, ClientId};
use crate::model::employee::Employee;
use crate::model::location::{Location, LocationOwnerId};
use crate::model::report::{RankRange, Ranked, TimeWindow};
use crate::model::work_log::{WorkLog, WorkLogId};
use crate::repo::account_repo::AccountQueries;
use crate::repo::business_repo::BusinessQueries;
use crate::repo::client_repo::ClientQueries;
use crate::repo::employee_repo::EmployeeQueries;
use crate::repo::error::StoreResult;
use crate::repo::location_repo::LocationQueries;
use crate::repo::work_log_repo::WorkLogQueries;

/// Use-case facade over a Connection Provider.
pub struct WorkforceService<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> WorkforceService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Gives the provider back, e.g. to shut a pool down.
    pub fn into_provider(self) -> P {
        self.provider
    }

    pub fn create_account(&self, account: &Account) -> StoreResult<()> {
        AccountQueries::new(&self.provider)?.create_account(account)
    }

    pub fn get_account(&self, user_name: &str, business_tag: &str) -> StoreResult<Option<Account>> {
        AccountQueries::new(&self.provider)?.get_account(user_name, business_tag)
    }

    /// Creates a business together with its first employee.
    pub fn create_business(&self, business: &Business, owner: &Employee) -> StoreResult<()> {
        BusinessQueries::new(&self.provider)?.create_business(business, owner)
    }

    pub fn get_business(&self, business_tag: &str) -> StoreResult<Option<Business>> {
        BusinessQueries::new(&self.provider)?.get_business(business_tag)
    }

    pub fn get_all_businesses(&self) -> StoreResult<Vec<Business>> {
        BusinessQueries::new(&self.provider)?.get_all_businesses()
    }

    pub fn create_employee(&self, employee: &Employee) -> StoreResult<()> {
        EmployeeQueries::new(&self.provider)?.create_employee(employee)
    }

    pub fn get_employee(&self, user_name: &str, business_tag: &str) -> StoreResult<Option<Employee>> {
        EmployeeQueries::new(&self.provider)?.get_employee(user_name, business_tag)
    }

    pub fn get_all_employees(&self, business_tag: &str) -> StoreResult<Vec<Employee>> {
        EmployeeQueries::new(&self.provider)?.get_all_employees(business_tag)
    }

    pub fn get_all_employees_by_most_worked_range(
        &self,
        business_tag: &str,
        ranks: RankRange,
        window: TimeWindow,
    ) -> StoreResult<Vec<Ranked<Employee>>> {
        EmployeeQueries::new(&self.provider)?
            .get_all_employees_by_most_worked_range(business_tag, ranks, window)
    }

    pub fn create_client(&self, client: &Client) -> StoreResult<ClientId> {
        ClientQueries::new(&self.provider)?.create_client(client)
    }

    pub fn get_client(&self, client_id: ClientId) -> StoreResult<Option<Client>> {
        ClientQueries::new(&self.provider)?.get_client(client_id)
    }

    pub fn get_all_clients(&self, business_tag: &str) -> StoreResult<Vec<Client>> {
        ClientQueries::new(&self.provider)?.get_all_clients(business_tag)
    }

    pub fn get_client_location_owner_id(
        &self,
        client_id: ClientId,
    ) -> StoreResult<Option<LocationOwnerId>> {
        ClientQueries::new(&self.provider)?.get_client_location_owner_id(client_id)
    }

    pub fn get_all_clients_by_most_worked_range(
        &self,
        business_tag: &str,
        ranks: RankRange,
        window: TimeWindow,
    ) -> StoreResult<Vec<Ranked<Client>>> {
        ClientQueries::new(&self.provider)?
            .get_all_clients_by_most_worked_range(business_tag, ranks, window)
    }

    pub fn create_work_log(&self, log: &WorkLog) -> StoreResult<WorkLogId> {
        WorkLogQueries::new(&self.provider)?.create_work_log(log)
    }

    pub fn get_work_log(&self, work_log_id: WorkLogId) -> StoreResult<Option<WorkLog>> {
        WorkLogQueries::new(&self.provider)?.get_work_log(work_log_id)
    }

    pub fn get_work_log_location_owner_id(
        &self,
        work_log_id: WorkLogId,
    ) -> StoreResult<Option<LocationOwnerId>> {
        WorkLogQueries::new(&self.provider)?.get_work_log_location_owner_id(work_log_id)
    }

    pub fn get_all_work_logs_for_employee(
        &self,
        user_name: &str,
        business_tag: &str,
        window: TimeWindow,
    ) -> StoreResult<Vec<WorkLog>> {
        WorkLogQueries::new(&self.provider)?
            .get_all_work_logs_for_employee(user_name, business_tag, window)
    }

    pub fn create_location_owner(&self, locations: &[Location]) -> StoreResult<LocationOwnerId> {
        LocationQueries::new(&self.provider)?.create_owner_with_locations(locations)
    }

    pub fn get_locations_for_owner(&self, owner_id: LocationOwnerId) -> StoreResult<Vec<Location>> {
        LocationQueries::new(&self.provider)?.get_locations_for_owner(owner_id)
    }
}
