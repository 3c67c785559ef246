use crate::command::Command;

/// A self-contained piece of state driven by messages.
///
/// A component owns its state and changes it only inside
/// [`update`](Component::update).  The returned [`Command`] carries
/// notifications for whoever owns the component; an owner that embeds several
/// components wraps each child's message type in one of its own variants and
/// lifts child commands with [`Command::map`]:
///
/// ```rust,ignore
/// use sendwise_core::{Command, Component};
///
/// struct Dialog { wizard: WizardStore<Form, FieldErrors> }
///
/// enum DialogMsg { Wizard(wizard::Message<Form, FieldErrors>), Close }
///
/// impl Component for Dialog {
///     type Message = DialogMsg;
///
///     fn update(&mut self, msg: DialogMsg) -> Command<DialogMsg> {
///         match msg {
///             DialogMsg::Wizard(m) => self.wizard.update(m).map(DialogMsg::Wizard),
///             DialogMsg::Close => Command::none(),
///         }
///     }
/// }
/// ```
pub trait Component: 'static {
    /// The component's message type.
    ///
    /// Requests (things the owner asks the component to do) and notifications
    /// (things the component reports back) usually share one enum; a
    /// notification delivered back into `update` should be a no-op.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] describing
    /// what the owner should observe.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;
}
