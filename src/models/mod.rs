mod user;
mod loan;
mod task;
mod ledger;
mod forms;

pub use user::{Role, User, UserProfile};
pub use loan::{AdminLoanPayload, Loan, LoanStatus};
pub use task::{CodPaymentDetails, NewTask, Task, TaskStatus, COD_FUNDING, SIMULATED_PLATFORM_PAYMENT};
pub use ledger::{LedgerEntry, LedgerSummary, PaymentType};
pub use forms::{
    validate_admin_loan, ApiResponse, AssignTaskForm, EstimateQuery, LoanApplicationForm,
    LoginForm, PostTaskForm, ProfileForm, SignupForm, TaskQuery, UserQuery,
};
