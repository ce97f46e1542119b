// ============================================================================
// REACTIVITY - Valor observable con notificación a subscribers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber = Rc<dyn Fn()>;

/// Valor compartido Rc<RefCell> que notifica a sus subscribers en cada
/// mutación. Los clones comparten valor Y subscribers.
pub struct Observable<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Reemplaza el valor y notifica
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Muta el valor in-place y notifica
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut self.value.borrow_mut());
        self.notify();
    }

    /// Acceso de lectura sin clonar
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn notify(&self) {
        // Clonar la lista antes de invocar: un subscriber puede suscribir
        // a otros (o leer el valor) sin chocar con el borrow
        let subscribers: Vec<Subscriber> = self.subscribers.borrow().iter().cloned().collect();
        for subscriber in subscribers {
            subscriber();
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn snapshot(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_notifica_a_los_subscribers() {
        let observable = Observable::new(0u32);
        let fired = Rc::new(Cell::new(0u32));

        let fired_clone = fired.clone();
        observable.subscribe(move || fired_clone.set(fired_clone.get() + 1));

        observable.set(1);
        observable.update(|v| *v += 1);

        assert_eq!(observable.snapshot(), 2);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn los_clones_comparten_valor_y_subscribers() {
        let original = Observable::new(vec![1]);
        let clone = original.clone();

        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        original.subscribe(move || fired_clone.set(true));

        clone.update(|v| v.push(2));

        assert_eq!(original.snapshot(), vec![1, 2]);
        assert!(fired.get());
    }

    #[test]
    fn el_subscriber_puede_leer_el_valor_durante_notify() {
        let observable = Observable::new(5u32);
        let seen = Rc::new(Cell::new(0u32));

        let obs_clone = observable.clone();
        let seen_clone = seen.clone();
        observable.subscribe(move || seen_clone.set(obs_clone.snapshot()));

        observable.set(9);
        assert_eq!(seen.get(), 9);
    }
}
